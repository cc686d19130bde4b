// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    check_anomaly, classify_score, delete_session, detect_pollution, get_notifications, get_session,
    health_check, latest_readings, list_locations, list_readings, location_trend, put_notifications,
    put_session, reading_summary, role_dashboard, sensor_snapshot, stream_sensors,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/readings", get(list_readings))
        .route("/readings/latest", get(latest_readings))
        .route("/readings/summary", get(reading_summary))
        .route("/locations", get(list_locations))
        .route("/locations/:name/trend", get(location_trend))
        .route("/rwqi/classify", get(classify_score))
        .route("/sensors", get(sensor_snapshot))
        .route("/sensors/anomaly", post(check_anomaly))
        .route("/sensors/stream", get(stream_sensors))
        .route("/detections", post(detect_pollution))
        .route("/dashboards/:role", get(role_dashboard))
        .route(
            "/settings/notifications",
            get(get_notifications).put(put_notifications),
        )
        .route(
            "/session",
            get(get_session).put(put_session).delete(delete_session),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
