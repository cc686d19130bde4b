// Dashboard domain model
use super::sensor::Severity;
use super::settings::Role;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl TileData {
    pub fn new(id: impl Into<String>, title: impl Into<String>, unit: impl Into<String>, value: f64, precision: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            unit: unit.into(),
            value,
            precision,
            color: None,
            caption: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    Sensor,
    Rwqi,
    Trash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub source: AlertSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub role: Role,
    pub tiles: Vec<TileData>,
    pub alerts: Vec<Alert>,
}

impl Dashboard {
    pub fn new(title: String, role: Role, tiles: Vec<TileData>, alerts: Vec<Alert>) -> Self {
        Self {
            title,
            role,
            tiles,
            alerts,
        }
    }
}
