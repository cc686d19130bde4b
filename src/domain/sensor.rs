// Live sensor samples and threshold-based anomaly detection
use super::error::{ensure_finite, DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

const PH_LOW: f64 = 5.5;
const PH_CRITICAL_LOW: f64 = 4.5;
const PH_HIGH: f64 = 9.0;
const PH_CRITICAL_HIGH: f64 = 10.0;
const DO_LOW: f64 = 4.0;
const DO_CRITICAL_LOW: f64 = 2.0;
const TURBIDITY_HIGH: f64 = 60.0;
const TURBIDITY_CRITICAL_HIGH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Display label for the sample time, e.g. "14:05".
    pub time: String,
    pub ph: f64,
    /// Dissolved oxygen in mg/L.
    #[serde(rename = "do")]
    pub dissolved_oxygen: f64,
    pub temp: f64,
    /// NTU.
    pub turbidity: f64,
    pub conductivity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub is_anomaly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl AnomalyReport {
    pub fn normal() -> Self {
        Self {
            is_anomaly: false,
            parameter: None,
            message: None,
            severity: None,
        }
    }

    fn flagged(parameter: &str, severity: Severity, message: String) -> Self {
        Self {
            is_anomaly: true,
            parameter: Some(parameter.to_string()),
            message: Some(message),
            severity: Some(severity),
        }
    }
}

/// Inspect the most recent sample and report the first rule it breaks.
///
/// Rules run in a fixed order (low pH, high pH, low dissolved oxygen, high
/// turbidity) and the first match wins; severities are never aggregated
/// across parameters. An empty slice is not an anomaly.
pub fn detect_anomaly(samples: &[SensorSample]) -> Result<AnomalyReport, DomainError> {
    let Some(latest) = samples.last() else {
        return Ok(AnomalyReport::normal());
    };

    let ph = ensure_finite("ph", latest.ph)?;
    let dissolved_oxygen = ensure_finite("do", latest.dissolved_oxygen)?;
    let turbidity = ensure_finite("turbidity", latest.turbidity)?;

    if ph < PH_LOW {
        let (severity, wording) = if ph < PH_CRITICAL_LOW {
            (Severity::High, "critically low")
        } else {
            (Severity::Medium, "below safe range")
        };
        return Ok(AnomalyReport::flagged(
            "pH",
            severity,
            format!("pH level {} ({:.1})", wording, ph),
        ));
    }

    if ph > PH_HIGH {
        let (severity, wording) = if ph > PH_CRITICAL_HIGH {
            (Severity::High, "critically high")
        } else {
            (Severity::Medium, "above safe range")
        };
        return Ok(AnomalyReport::flagged(
            "pH",
            severity,
            format!("pH level {} ({:.1})", wording, ph),
        ));
    }

    if dissolved_oxygen < DO_LOW {
        let severity = if dissolved_oxygen < DO_CRITICAL_LOW {
            Severity::High
        } else {
            Severity::Medium
        };
        return Ok(AnomalyReport::flagged(
            "Dissolved Oxygen",
            severity,
            format!("Dissolved oxygen low ({:.1} mg/L)", dissolved_oxygen),
        ));
    }

    if turbidity > TURBIDITY_HIGH {
        let severity = if turbidity > TURBIDITY_CRITICAL_HIGH {
            Severity::High
        } else {
            Severity::Medium
        };
        return Ok(AnomalyReport::flagged(
            "Turbidity",
            severity,
            format!("Turbidity elevated ({:.0} NTU)", turbidity),
        ));
    }

    Ok(AnomalyReport::normal())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::SensorSample;

    pub fn sample(ph: f64, dissolved_oxygen: f64, turbidity: f64) -> SensorSample {
        SensorSample {
            time: "12:00".to_string(),
            ph,
            dissolved_oxygen,
            temp: 28.5,
            turbidity,
            conductivity: 180.0,
        }
    }
}
