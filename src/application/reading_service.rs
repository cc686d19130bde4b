// Reading service - Use cases over the river quality table
use crate::application::reading_repository::ReadingRepository;
use crate::domain::error::DomainError;
use crate::domain::reading::{ClassifiedReading, RiverQualityReading, TrendPoint};
use crate::domain::rwqi::{classify, RwqiCategory, RwqiClass};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: RwqiCategory,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSummary {
    pub reading_count: usize,
    pub location_count: usize,
    pub average_rwqi: Option<RwqiClass>,
    pub categories: Vec<CategoryCount>,
    pub total_trash_detected: u32,
}

#[derive(Clone)]
pub struct ReadingService {
    repository: Arc<dyn ReadingRepository>,
}

impl ReadingService {
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, location: Option<&str>) -> anyhow::Result<Vec<ClassifiedReading>> {
        let readings = match location {
            Some(location) => self.repository.readings_for(location).await?,
            None => self.repository.all_readings().await?,
        };
        classify_all(readings)
    }

    /// Distinct location names in first-seen order
    pub async fn locations(&self) -> anyhow::Result<Vec<String>> {
        let readings = self.repository.all_readings().await?;
        Ok(distinct_locations(&readings))
    }

    /// Most recent reading per location, used for map markers
    pub async fn latest_by_location(&self) -> anyhow::Result<Vec<ClassifiedReading>> {
        let readings = self.repository.all_readings().await?;
        let order = distinct_locations(&readings);

        let mut latest: HashMap<String, RiverQualityReading> = HashMap::new();
        for reading in readings {
            // Later rows win ties on date
            let newer = latest
                .get(&reading.location)
                .map_or(true, |current| reading.date >= current.date);
            if newer {
                latest.insert(reading.location.clone(), reading);
            }
        }

        let ordered = order
            .into_iter()
            .filter_map(|location| latest.remove(&location))
            .collect();
        classify_all(ordered)
    }

    pub async fn trend(&self, location: &str) -> anyhow::Result<Vec<TrendPoint>> {
        let mut readings = self.repository.readings_for(location).await?;
        if readings.is_empty() {
            return Err(DomainError::UnknownLocation(location.to_string()).into());
        }

        readings.sort_by_key(|r| r.date);
        Ok(readings
            .into_iter()
            .map(|r| TrendPoint {
                date: r.date,
                rwqi_score: r.rwqi_score,
            })
            .collect())
    }

    pub async fn summary(&self) -> anyhow::Result<ReadingSummary> {
        let readings = self.repository.all_readings().await?;

        let mut counts: HashMap<RwqiCategory, usize> = HashMap::new();
        let mut total_score = 0.0;
        let mut total_trash = 0u32;
        for reading in &readings {
            let class = reading.classification()?;
            *counts.entry(class.category).or_default() += 1;
            total_score += reading.rwqi_score;
            total_trash += u32::from(reading.trash_detected);
        }

        let average_rwqi = if readings.is_empty() {
            None
        } else {
            Some(classify(total_score / readings.len() as f64)?)
        };

        let categories = RwqiCategory::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                color: category.color(),
                count: counts.get(category).copied().unwrap_or(0),
            })
            .collect();

        Ok(ReadingSummary {
            reading_count: readings.len(),
            location_count: distinct_locations(&readings).len(),
            average_rwqi,
            categories,
            total_trash_detected: total_trash,
        })
    }
}

fn distinct_locations(readings: &[RiverQualityReading]) -> Vec<String> {
    let mut seen = Vec::new();
    for reading in readings {
        if !seen.contains(&reading.location) {
            seen.push(reading.location.clone());
        }
    }
    seen
}

fn classify_all(readings: Vec<RiverQualityReading>) -> anyhow::Result<Vec<ClassifiedReading>> {
    readings
        .into_iter()
        .map(|r| ClassifiedReading::new(r).map_err(anyhow::Error::from))
        .collect()
}
