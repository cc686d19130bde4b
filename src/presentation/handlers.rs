// HTTP request handlers
use crate::domain::detection::FrameRequest;
use crate::domain::rwqi::classify;
use crate::domain::sensor::{detect_anomaly, SensorSample};
use crate::domain::settings::{NotificationPreferences, Role, UserProfile};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::extract::{ApiJson, ApiQuery};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type ApiResult = Result<Response, ApiError>;

#[derive(Deserialize)]
pub struct ReadingQuery {
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct ScoreQuery {
    pub score: f64,
}

async fn respond<T: Serialize>(headers: &HeaderMap, data: &T) -> Response {
    match json_response(data, StatusCode::OK, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_readings(
    ApiQuery(query): ApiQuery<ReadingQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let readings = state
        .reading_service
        .list(query.location.as_deref())
        .await?;
    Ok(respond(&headers, &readings).await)
}

/// Latest classified reading per location (map markers)
pub async fn latest_readings(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    let latest = state.reading_service.latest_by_location().await?;
    Ok(respond(&headers, &latest).await)
}

pub async fn reading_summary(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    let summary = state.reading_service.summary().await?;
    Ok(respond(&headers, &summary).await)
}

pub async fn list_locations(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    let locations = state.reading_service.locations().await?;
    Ok(respond(&headers, &locations).await)
}

pub async fn location_trend(
    Path(name): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let trend = state.reading_service.trend(&name).await?;
    Ok(respond(&headers, &trend).await)
}

pub async fn classify_score(ApiQuery(query): ApiQuery<ScoreQuery>, headers: HeaderMap) -> ApiResult {
    let class = classify(query.score)?;
    Ok(respond(&headers, &class).await)
}

/// Current sensor window plus the anomaly report for its latest sample
pub async fn sensor_snapshot(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    let snapshot = state.sensor_feed.snapshot()?;
    Ok(respond(&headers, &snapshot).await)
}

pub async fn check_anomaly(headers: HeaderMap, ApiJson(samples): ApiJson<Vec<SensorSample>>) -> ApiResult {
    let report = detect_anomaly(&samples)?;
    Ok(respond(&headers, &report).await)
}

/// Stream live sensor updates as newline-delimited JSON
pub async fn stream_sensors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("sensor stream client connected");
    stream_from_receiver(state.sensor_feed.subscribe())
}

pub async fn detect_pollution(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    ApiJson(frame): ApiJson<FrameRequest>,
) -> ApiResult {
    let detections = state.detector.detect(&frame).await?;
    Ok(respond(&headers, &detections).await)
}

pub async fn role_dashboard(
    Path(role): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let role: Role = role.parse()?;
    let dashboard = state.dashboard_service.dashboard(role).await?;
    Ok(respond(&headers, &dashboard).await)
}

pub async fn get_notifications(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    let preferences = state.settings_service.notifications().await?;
    Ok(respond(&headers, &preferences).await)
}

pub async fn put_notifications(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    ApiJson(preferences): ApiJson<NotificationPreferences>,
) -> ApiResult {
    let saved = state
        .settings_service
        .update_notifications(preferences)
        .await?;
    Ok(respond(&headers, &saved).await)
}

pub async fn get_session(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    match state.settings_service.current_user().await? {
        Some(user) => Ok(respond(&headers, &user).await),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn put_session(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    ApiJson(user): ApiJson<UserProfile>,
) -> ApiResult {
    if user.id.trim().is_empty() || user.email.trim().is_empty() {
        return Err(ApiError::BadRequest("id and email are required".to_string()));
    }
    let user = state.settings_service.sign_in(user).await?;
    Ok(respond(&headers, &user).await)
}

pub async fn delete_session(State(state): State<Arc<AppState>>) -> ApiResult {
    state.settings_service.sign_out().await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}


#[cfg(test)]
mod tests {
    use super::test_support::{body_json, test_state};
    use super::*;
    use crate::domain::sensor::fixtures::sample;

    #[tokio::test]
    async fn test_classify_endpoint() {
        let response = classify_score(ApiQuery(ScoreQuery { score: 0.43 }), HeaderMap::new())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["category"], "Poor");
        assert_eq!(json["color"], "#f59e0b");

        let err = classify_score(ApiQuery(ScoreQuery { score: f64::NAN }), HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_anomaly_endpoint() {
        let response = check_anomaly(HeaderMap::new(), ApiJson(vec![sample(7.2, 3.0, 10.0)]))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["parameter"], "Dissolved Oxygen");
        assert_eq!(json["severity"], "medium");

        let empty = body_json(check_anomaly(HeaderMap::new(), ApiJson(vec![])).await.unwrap()).await;
        assert_eq!(empty, serde_json::json!({ "isAnomaly": false }));
    }

    #[tokio::test]
    async fn test_readings_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let all = body_json(
            list_readings(ApiQuery(ReadingQuery { location: None }), HeaderMap::new(), State(state.clone()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(all.as_array().unwrap().len(), 36);

        let latest = body_json(latest_readings(HeaderMap::new(), State(state.clone())).await.unwrap()).await;
        assert_eq!(latest.as_array().unwrap().len(), 6);
        assert!(latest[0]["rwqi"]["category"].is_string());

        let err = location_trend(Path("Sungai Tiada".to_string()), HeaderMap::new(), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_endpoint_rejects_unknown_role() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let ok = role_dashboard(Path("cleanup".to_string()), HeaderMap::new(), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body_json(ok).await["role"], "cleanup");

        let err = role_dashboard(Path("admin".to_string()), HeaderMap::new(), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_detection_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let json = body_json(
            detect_pollution(HeaderMap::new(), State(state), ApiJson(FrameRequest::new(4.0)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json[0]["type"], "oil");
        assert_eq!(json[0]["timestamp"], 4.0);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let empty = get_session(HeaderMap::new(), State(state.clone())).await.unwrap();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);

        let user = UserProfile {
            id: "crew-3".to_string(),
            email: "crew@bersih.my".to_string(),
            name: "Crew Three".to_string(),
            role: Role::Cleanup,
            photo_url: None,
        };
        put_session(HeaderMap::new(), State(state.clone()), ApiJson(user))
            .await
            .unwrap();
        let current = body_json(get_session(HeaderMap::new(), State(state.clone())).await.unwrap()).await;
        assert_eq!(current["role"], "cleanup");

        let deleted = delete_session(State(state.clone())).await.unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let invalid = UserProfile {
            id: " ".to_string(),
            email: "x@y.my".to_string(),
            name: "X".to_string(),
            role: Role::Public,
            photo_url: None,
        };
        let err = put_session(HeaderMap::new(), State(state), ApiJson(invalid))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notifications_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let prefs = NotificationPreferences {
            email: false,
            sms: true,
            app: false,
            critical: true,
            sensor: false,
            cleanup: true,
        };
        put_notifications(HeaderMap::new(), State(state.clone()), ApiJson(prefs))
            .await
            .unwrap();
        let json = body_json(get_notifications(HeaderMap::new(), State(state)).await.unwrap()).await;
        assert_eq!(
            json,
            serde_json::json!({"email": false, "sms": true, "app": false, "critical": true, "sensor": false, "cleanup": true})
        );
    }
}
