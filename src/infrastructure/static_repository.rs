// Embedded river quality table
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::RiverQualityReading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

const EMBEDDED_READINGS: &str = include_str!("../../data/readings.json");

/// Readings parsed and validated once at startup, shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct StaticReadingRepository {
    readings: Arc<[RiverQualityReading]>,
}

impl StaticReadingRepository {
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_READINGS).context("Embedded readings table is invalid")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let readings: Vec<RiverQualityReading> =
            serde_json::from_str(json).context("Failed to parse readings JSON")?;
        Self::from_readings(readings)
    }

    pub fn from_readings(readings: Vec<RiverQualityReading>) -> Result<Self> {
        for (index, reading) in readings.iter().enumerate() {
            reading
                .validate()
                .with_context(|| format!("Reading #{} ({}) failed validation", index, reading.location))?;
        }
        tracing::debug!("Loaded {} river quality readings", readings.len());
        Ok(Self {
            readings: readings.into(),
        })
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }
}

#[async_trait]
impl ReadingRepository for StaticReadingRepository {
    async fn all_readings(&self) -> Result<Vec<RiverQualityReading>> {
        Ok(self.readings.to_vec())
    }

    async fn readings_for(&self, location: &str) -> Result<Vec<RiverQualityReading>> {
        Ok(self
            .readings
            .iter()
            .filter(|r| r.location.eq_ignore_ascii_case(location))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::fixtures::reading;

    #[test]
    fn test_embedded_table_loads() {
        let repository = StaticReadingRepository::embedded().unwrap();
        assert_eq!(repository.reading_count(), 36);
        assert!(repository
            .readings
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.rwqi_score) && r.trash_detected <= 10));
    }

    #[test]
    fn test_invalid_row_rejected() {
        let json = r#"[{
            "date": "2024-01-15", "location": "Sungai Klang",
            "dissolvedOxygen": 5.0, "biochemicalOxygenDemand": 5.0,
            "chemicalOxygenDemand": 40.0, "ammoniacalNitrogen": 1.0,
            "pH": 7.0, "trashDetected": 3, "rwqiScore": 1.5
        }]"#;
        let err = StaticReadingRepository::from_json(json).unwrap_err();
        assert!(format!("{:#}", err).contains("rwqiScore"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(StaticReadingRepository::from_json("[{\"date\": \"yesterday\"}]").is_err());
    }

    #[tokio::test]
    async fn test_readings_for_is_case_insensitive() {
        let repository = StaticReadingRepository::embedded().unwrap();
        let klang = repository.readings_for("sungai klang").await.unwrap();
        assert_eq!(klang.len(), 6);
        assert!(klang.iter().all(|r| r.location == "Sungai Klang"));
        assert!(repository.readings_for("Sungai Tiada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readings_for_keeps_table_order() {
        let repository = StaticReadingRepository::from_readings(vec![
            reading("2024-03-01", "Sungai Klang", 0.40, 4),
            reading("2024-01-01", "Sungai Gombak", 0.70, 2),
            reading("2024-01-01", "Sungai Klang", 0.50, 3),
            reading("2024-02-01", "Sungai Klang", 0.45, 5),
        ])
        .unwrap();

        let dates: Vec<String> = repository
            .readings_for("SUNGAI KLANG")
            .await
            .unwrap()
            .iter()
            .map(|r| r.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-01", "2024-02-01"]);
    }
}
