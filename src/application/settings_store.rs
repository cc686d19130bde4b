// Storage trait for the persisted settings document
use crate::domain::error::DomainError;
use crate::domain::settings::SettingsDocument;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<SettingsDocument>, DomainError>;

    async fn save(&self, document: &SettingsDocument) -> Result<(), DomainError>;
}
