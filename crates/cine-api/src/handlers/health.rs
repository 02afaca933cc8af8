//! Health and status handlers

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use cine_core::SystemStatus;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub version: String,
}

/// Liveness probe - basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Status page response
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub data: SystemStatus,
    pub uptime_seconds: u64,
    pub total_requests: u64,
}

/// Reachability of the document store and vector index
///
/// Always answers 200; an unreachable collaborator is reported in the body.
#[utoipa::path(
    get,
    path = "/status",
    tag = "health",
    responses(
        (status = 200, description = "Collaborator status", body = StatusResponse)
    )
)]
pub async fn system_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.increment_requests();
    let data = state.context.status().await;

    Json(StatusResponse {
        success: true,
        data,
        uptime_seconds: state.uptime_secs(),
        total_requests: state.get_request_count(),
    })
}
