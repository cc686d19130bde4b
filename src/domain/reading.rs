// River quality reading domain model
use super::error::{ensure_finite, DomainError};
use super::rwqi::{classify, RwqiClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_TRASH_LEVEL: u8 = 10;

/// One lab sample for a river location. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverQualityReading {
    pub date: NaiveDate,
    pub location: String,
    pub dissolved_oxygen: f64,
    pub biochemical_oxygen_demand: f64,
    pub chemical_oxygen_demand: f64,
    pub ammoniacal_nitrogen: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub trash_detected: u8,
    pub rwqi_score: f64,
}

impl RiverQualityReading {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_finite("dissolvedOxygen", self.dissolved_oxygen)?;
        ensure_finite("biochemicalOxygenDemand", self.biochemical_oxygen_demand)?;
        ensure_finite("chemicalOxygenDemand", self.chemical_oxygen_demand)?;
        ensure_finite("ammoniacalNitrogen", self.ammoniacal_nitrogen)?;
        ensure_finite("pH", self.ph)?;
        let score = ensure_finite("rwqiScore", self.rwqi_score)?;

        if !(0.0..=1.0).contains(&score) {
            return Err(DomainError::OutOfRange {
                field: "rwqiScore",
                reason: format!("{} is outside [0, 1] for {} on {}", score, self.location, self.date),
            });
        }
        if self.trash_detected > MAX_TRASH_LEVEL {
            return Err(DomainError::OutOfRange {
                field: "trashDetected",
                reason: format!("{} exceeds {}", self.trash_detected, MAX_TRASH_LEVEL),
            });
        }
        Ok(())
    }

    pub fn classification(&self) -> Result<RwqiClass, DomainError> {
        classify(self.rwqi_score)
    }
}

/// A reading paired with the RWQI category displays should render it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedReading {
    #[serde(flatten)]
    pub reading: RiverQualityReading,
    pub rwqi: RwqiClass,
}

impl ClassifiedReading {
    pub fn new(reading: RiverQualityReading) -> Result<Self, DomainError> {
        let rwqi = reading.classification()?;
        Ok(Self { reading, rwqi })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    #[serde(rename = "rwqiScore")]
    pub rwqi_score: f64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn reading(date: &str, location: &str, rwqi_score: f64, trash_detected: u8) -> RiverQualityReading {
        RiverQualityReading {
            date: date.parse().unwrap(),
            location: location.to_string(),
            dissolved_oxygen: 5.8,
            biochemical_oxygen_demand: 3.1,
            chemical_oxygen_demand: 22.0,
            ammoniacal_nitrogen: 0.6,
            ph: 7.1,
            trash_detected,
            rwqi_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::reading;
    use super::*;

    #[test]
    fn test_deserialize_field_names() {
        let json = r#"{
            "date": "2024-03-01",
            "location": "Sungai Klang",
            "dissolvedOxygen": 4.2,
            "biochemicalOxygenDemand": 5.5,
            "chemicalOxygenDemand": 38.0,
            "ammoniacalNitrogen": 1.9,
            "pH": 6.8,
            "trashDetected": 7,
            "rwqiScore": 0.43
        }"#;
        let parsed: RiverQualityReading = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.location, "Sungai Klang");
        assert_eq!(parsed.ph, 6.8);
        assert_eq!(parsed.trash_detected, 7);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["pH"], 6.8);
        assert_eq!(back["date"], "2024-03-01");
    }

    #[test]
    fn test_validate_rejects_bad_score() {
        assert!(reading("2024-01-01", "Sungai Gombak", 0.7, 2).validate().is_ok());
        assert!(matches!(
            reading("2024-01-01", "Sungai Gombak", 1.2, 2).validate(),
            Err(DomainError::OutOfRange { field: "rwqiScore", .. })
        ));
        assert!(reading("2024-01-01", "Sungai Gombak", f64::NAN, 2).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_trash_above_ten() {
        assert!(matches!(
            reading("2024-01-01", "Sungai Gombak", 0.5, 11).validate(),
            Err(DomainError::OutOfRange { field: "trashDetected", .. })
        ));
    }

    #[test]
    fn test_classified_reading_flattens() {
        let classified = ClassifiedReading::new(reading("2024-01-01", "Sungai Gombak", 0.43, 2)).unwrap();
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["location"], "Sungai Gombak");
        assert_eq!(json["rwqi"]["category"], "Poor");
    }
}
