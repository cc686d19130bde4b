// JSON file store for the settings document
use crate::application::settings_store::SettingsStore;
use crate::domain::error::DomainError;
use crate::domain::settings::SettingsDocument;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Option<SettingsDocument>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::storage(format!("{}: {}", self.path.display(), e))),
        };

        let document = serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(document))
    }

    async fn save(&self, document: &SettingsDocument) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(DomainError::storage)?;
        }

        let json = serde_json::to_vec_pretty(document).map_err(DomainError::storage)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(DomainError::storage)?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(DomainError::storage)?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
