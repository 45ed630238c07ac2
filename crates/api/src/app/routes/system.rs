use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::errors::ApiError;

/// Liveness probe; does not touch storage.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
