// Domain errors shared by services and adapters
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("settings version {found} is newer than supported version {supported}")]
    UnsupportedSettingsVersion { found: u32, supported: u32 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Rejects NaN and infinities so the threshold rules never see them.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFiniteValue { field, value })
    }
}
