// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::pollution_detector::PollutionDetector;
use crate::application::reading_service::ReadingService;
use crate::application::sensor_feed::SensorFeed;
use crate::application::settings_service::SettingsService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reading_service: ReadingService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub sensor_feed: Arc<SensorFeed>,
    pub detector: Arc<dyn PollutionDetector>,
}
