//! Admin handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use cine_core::SentinelDocument;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Connection test response
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionTestResponse {
    pub success: bool,
    pub message: String,
    /// Sentinel document read back from the store
    pub data: Option<SentinelDocument>,
}

/// Write and read back the sentinel document
#[utoipa::path(
    post,
    path = "/api/v1/admin/connection-test",
    tag = "admin",
    responses(
        (status = 200, description = "Store is reachable", body = ConnectionTestResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ApiError)
    )
)]
pub async fn connection_test(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let health = state.context.probe().check_store_health().await?;
    Ok(Json(ConnectionTestResponse {
        success: true,
        message: health.message,
        data: health.data,
    }))
}
