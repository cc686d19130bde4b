// Application layer - Use cases and capability traits
pub mod dashboard_service;
pub mod pollution_detector;
pub mod reading_repository;
pub mod reading_service;
pub mod sensor_feed;
pub mod settings_service;
pub mod settings_store;
