//! Liveness and dependency status endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::{Json, StatusResponse};

use super::state::AppState;

#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Simple health check - returns 200 if the process is running
pub async fn health_check() -> impl IntoResponse {
    let response = LivenessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check for process supervisors
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /api/status - composite dependency status, re-evaluated on every call
pub async fn status_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.status_service.check().await;

    let status_code = if status.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(StatusResponse::from(status)))
}
