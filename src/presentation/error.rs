// Mapping of service errors onto HTTP responses
use crate::domain::error::DomainError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    BadRequest(String),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => ApiError::Domain(domain),
            Err(other) => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::NonFiniteValue { .. })
            | ApiError::Domain(DomainError::OutOfRange { .. })
            | ApiError::BadRequest(_)
            | ApiError::Body(_)
            | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::UnknownLocation(_))
            | ApiError::Domain(DomainError::UnknownRole(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::UnsupportedSettingsVersion { .. }) => StatusCode::CONFLICT,
            ApiError::Domain(DomainError::Storage(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
