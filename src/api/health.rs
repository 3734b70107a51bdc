//! Status and liveness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::AppState;
use super::types::{ApiError, Json};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(RootResponse {
        message: "Server running successfully".to_string(),
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
    })
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response))
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
