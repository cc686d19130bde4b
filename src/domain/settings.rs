// Persisted user session and notification preferences
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

pub const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Government,
    Cleanup,
    Public,
    Publisher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Government => "government",
            Role::Cleanup => "cleanup",
            Role::Public => "public",
            Role::Publisher => "publisher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "government" => Ok(Role::Government),
            "cleanup" => Ok(Role::Cleanup),
            "public" => Ok(Role::Public),
            "publisher" => Ok(Role::Publisher),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub app: bool,
    pub critical: bool,
    pub sensor: bool,
    pub cleanup: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            app: true,
            critical: true,
            sensor: true,
            cleanup: false,
        }
    }
}

fn legacy_version() -> u32 {
    1
}

/// Everything the dashboard persists between sessions, under one versioned schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            user: None,
            notifications: NotificationPreferences::default(),
        }
    }
}

impl SettingsDocument {
    pub fn check_version(self) -> Result<Self, DomainError> {
        if self.version > SETTINGS_VERSION {
            return Err(DomainError::UnsupportedSettingsVersion {
                found: self.version,
                supported: SETTINGS_VERSION,
            });
        }
        Ok(Self {
            version: SETTINGS_VERSION,
            ..self
        })
    }
}
