// Dashboard service - Role-specific views over readings and the sensor feed
use crate::application::reading_service::ReadingService;
use crate::application::sensor_feed::SensorFeed;
use crate::domain::dashboard::{Alert, AlertSource, Dashboard, TileData};
use crate::domain::reading::ClassifiedReading;
use crate::domain::rwqi::RwqiCategory;
use crate::domain::sensor::Severity;
use crate::domain::settings::Role;
use std::sync::Arc;

const TRASH_HOTSPOT_LEVEL: u8 = 5;
const TRASH_SEVERE_LEVEL: u8 = 8;

#[derive(Clone)]
pub struct DashboardService {
    readings: ReadingService,
    feed: Arc<SensorFeed>,
}

impl DashboardService {
    pub fn new(readings: ReadingService, feed: Arc<SensorFeed>) -> Self {
        Self { readings, feed }
    }

    pub async fn dashboard(&self, role: Role) -> anyhow::Result<Dashboard> {
        let summary = self.readings.summary().await?;
        let latest = self.readings.latest_by_location().await?;

        let mut tiles = Vec::new();
        if let Some(average) = summary.average_rwqi {
            tiles.push(
                TileData::new("rwqi-average", "Average RWQI", "RWQI", average.score, 2)
                    .with_color(average.color)
                    .with_caption(average.category.label()),
            );
        }

        let mut alerts = Vec::new();

        match role {
            Role::Government => {
                tiles.extend(latest.iter().map(location_tile));
                alerts.extend(self.sensor_alert()?);
                alerts.extend(latest.iter().filter_map(very_poor_alert));
            }
            Role::Cleanup => {
                tiles.push(TileData::new(
                    "trash-total",
                    "Trash Detected",
                    "items",
                    f64::from(summary.total_trash_detected),
                    0,
                ));
                alerts.extend(latest.iter().filter_map(trash_alert));
            }
            Role::Public => {
                tiles.extend(latest.iter().map(location_tile));
            }
            Role::Publisher => {
                tiles.push(TileData::new(
                    "reading-count",
                    "Readings Published",
                    "readings",
                    summary.reading_count as f64,
                    0,
                ));
                tiles.push(TileData::new(
                    "location-count",
                    "Monitored Rivers",
                    "locations",
                    summary.location_count as f64,
                    0,
                ));
            }
        }

        // Most severe first, stable within a severity
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

        let title = format!("{} Dashboard", title_case(role.as_str()));
        tracing::debug!(%role, tiles = tiles.len(), alerts = alerts.len(), "built dashboard");
        Ok(Dashboard::new(title, role, tiles, alerts))
    }

    fn sensor_alert(&self) -> anyhow::Result<Option<Alert>> {
        let snapshot = self.feed.snapshot()?;
        let anomaly = snapshot.anomaly;
        Ok(match (anomaly.is_anomaly, anomaly.severity, anomaly.message) {
            (true, Some(severity), Some(message)) => Some(Alert {
                source: AlertSource::Sensor,
                location: None,
                severity,
                message,
            }),
            _ => None,
        })
    }
}

fn location_tile(reading: &ClassifiedReading) -> TileData {
    TileData::new(
        format!("rwqi-{}", slug(&reading.reading.location)),
        reading.reading.location.clone(),
        "RWQI",
        reading.rwqi.score,
        2,
    )
    .with_color(reading.rwqi.color)
    .with_caption(reading.rwqi.category.label())
}

fn very_poor_alert(reading: &ClassifiedReading) -> Option<Alert> {
    (reading.rwqi.category == RwqiCategory::VeryPoor).then(|| Alert {
        source: AlertSource::Rwqi,
        location: Some(reading.reading.location.clone()),
        severity: Severity::High,
        message: format!(
            "{} water quality is Very Poor (RWQI {:.2})",
            reading.reading.location, reading.rwqi.score
        ),
    })
}

fn trash_alert(reading: &ClassifiedReading) -> Option<Alert> {
    let level = reading.reading.trash_detected;
    if level < TRASH_HOTSPOT_LEVEL {
        return None;
    }
    let severity = if level >= TRASH_SEVERE_LEVEL {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Alert {
        source: AlertSource::Trash,
        location: Some(reading.reading.location.clone()),
        severity,
        message: format!(
            "Trash level {}/10 at {} needs a cleanup crew",
            level, reading.reading.location
        ),
    })
}

fn slug(name: &str) -> String {
    name.to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
