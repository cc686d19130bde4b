use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::sensor_feed::DEFAULT_WINDOW;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sensors: SensorSettings,
    #[serde(default)]
    pub detector: DetectorSettings,
    #[serde(default)]
    pub settings: SettingsFileSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorSettings {
    pub window: usize,
    pub interval_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            interval_ms: 3000,
            seed: None,
        }
    }
}

impl SensorSettings {
    pub fn interval(&self) -> Duration {
        // tokio intervals panic on zero
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DetectorSettings {
    pub latency_ms: u64,
    pub seed: Option<u64>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            seed: None,
        }
    }
}

impl DetectorSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SettingsFileSettings {
    pub path: PathBuf,
}

impl Default for SettingsFileSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/settings.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=info".to_string(),
        }
    }
}

/// Load `config/server.*` (optional) and `SUNGAI_*` environment overrides,
/// e.g. `SUNGAI_SENSORS__INTERVAL_MS=2000`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/server")
}

pub fn load_app_config_from(base: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(base).required(false))
        .add_source(
            config::Environment::with_prefix("SUNGAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_app_config_from("config/does-not-exist").unwrap();
        assert_eq!(config.sensors.window, 24);
        assert_eq!(config.detector.latency(), Duration::from_millis(1500));
        assert_eq!(config.settings.path, PathBuf::from("data/settings.json"));
    }

    #[test]
    fn test_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nbind = \"127.0.0.1:9000\"\n\n[sensors]\nwindow = 12\ninterval_ms = 0\nseed = 4\n"
        )
        .unwrap();

        let base = dir.path().join("server");
        let config = load_app_config_from(base.to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.sensors.window, 12);
        assert_eq!(config.sensors.seed, Some(4));
        assert_eq!(config.sensors.interval(), Duration::from_millis(1));
        // untouched sections fall back to defaults
        assert_eq!(config.detector.latency_ms, 1500);
    }
}
