//! Health check endpoint

use axum::{response::IntoResponse, Json};
use tracing::info;

use crate::models::HealthResponse;

/// Health check endpoint
///
/// Reports liveness of the console process itself.
pub async fn health_check() -> impl IntoResponse {
    info!("Health check requested");

    Json(HealthResponse::healthy())
}
