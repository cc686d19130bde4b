// Domain layer - Water quality types and scoring rules
pub mod dashboard;
pub mod detection;
pub mod error;
pub mod reading;
pub mod rwqi;
pub mod sensor;
pub mod settings;
