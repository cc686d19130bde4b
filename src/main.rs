// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::pollution_detector::MockPollutionDetector;
use crate::application::reading_service::ReadingService;
use crate::application::sensor_feed::SensorFeed;
use crate::application::settings_service::SettingsService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::settings_file::JsonFileSettingsStore;
use crate::infrastructure::static_repository::StaticReadingRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config()?;

    // Initialize tracing, RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create repositories (infrastructure layer)
    let repository = Arc::new(StaticReadingRepository::embedded()?);
    let settings_store = Arc::new(JsonFileSettingsStore::new(config.settings.path.clone()));
    tracing::info!(
        readings = repository.reading_count(),
        settings = %settings_store.path().display(),
        "data sources ready"
    );

    // Create services (application layer)
    let sensor_feed = Arc::new(SensorFeed::new(config.sensors.window, config.sensors.seed));
    sensor_feed.warm_up(config.sensors.window)?;
    let feed_handle = sensor_feed.spawn(config.sensors.interval());

    let detector = Arc::new(match config.detector.seed {
        Some(seed) => MockPollutionDetector::seeded(seed, config.detector.latency()),
        None => MockPollutionDetector::new(config.detector.latency()),
    });

    let reading_service = ReadingService::new(repository);
    let dashboard_service = DashboardService::new(reading_service.clone(), sensor_feed.clone());
    let settings_service = SettingsService::new(settings_store);

    // Create application state
    let state = Arc::new(AppState {
        reading_service,
        dashboard_service,
        settings_service,
        sensor_feed,
        detector,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting sungai-monitor service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    feed_handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
