// Extractors whose rejections render as `ApiError`
use crate::presentation::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

/// JSON body; malformed or incomplete bodies become a 400 with a JSON error.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
