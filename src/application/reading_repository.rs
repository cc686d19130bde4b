// Repository trait for river quality readings
use crate::domain::reading::RiverQualityReading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// All readings, in the order the source table lists them
    async fn all_readings(&self) -> anyhow::Result<Vec<RiverQualityReading>>;

    /// Readings for one location (case-insensitive), in table order
    async fn readings_for(&self, location: &str) -> anyhow::Result<Vec<RiverQualityReading>>;
}
