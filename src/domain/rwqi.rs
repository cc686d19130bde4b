// River Water Quality Index classification
use super::error::{ensure_finite, DomainError};
use serde::{Serialize, Serializer};
use std::fmt;

const GOOD_THRESHOLD: f64 = 0.8;
const MODERATE_THRESHOLD: f64 = 0.6;
const POOR_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RwqiCategory {
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl RwqiCategory {
    pub const ALL: [RwqiCategory; 4] = [
        RwqiCategory::Good,
        RwqiCategory::Moderate,
        RwqiCategory::Poor,
        RwqiCategory::VeryPoor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RwqiCategory::Good => "Good",
            RwqiCategory::Moderate => "Moderate",
            RwqiCategory::Poor => "Poor",
            RwqiCategory::VeryPoor => "Very Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RwqiCategory::Good => "#10b981",
            RwqiCategory::Moderate => "#f97316",
            RwqiCategory::Poor => "#f59e0b",
            RwqiCategory::VeryPoor => "#ef4444",
        }
    }

    fn from_score(score: f64) -> Self {
        // Evaluated high-to-low; out-of-range scores land in the outer buckets
        if score >= GOOD_THRESHOLD {
            RwqiCategory::Good
        } else if score >= MODERATE_THRESHOLD {
            RwqiCategory::Moderate
        } else if score >= POOR_THRESHOLD {
            RwqiCategory::Poor
        } else {
            RwqiCategory::VeryPoor
        }
    }
}

impl fmt::Display for RwqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RwqiCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A score together with the category and color a display should use for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RwqiClass {
    pub score: f64,
    pub category: RwqiCategory,
    pub color: &'static str,
}

/// Classify an RWQI score. Any finite value is accepted.
pub fn classify(score: f64) -> Result<RwqiClass, DomainError> {
    let score = ensure_finite("rwqiScore", score)?;
    let category = RwqiCategory::from_score(score);
    Ok(RwqiClass {
        score,
        category,
        color: category.color(),
    })
}
