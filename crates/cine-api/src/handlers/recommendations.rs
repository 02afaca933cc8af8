//! Free-text recommendation handler

use crate::error::AppError;
use crate::handlers::movies::MatchesResponse;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Recommendation request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecommendationRequest {
    /// What the viewer is in the mood for
    #[validate(length(min = 1, message = "query required"))]
    #[schema(example = "dream thief")]
    pub query: String,
    /// Maximum matches to return
    #[serde(default = "default_k")]
    #[validate(range(min = 1, message = "k must be at least 1"))]
    pub k: usize,
}

fn default_k() -> usize {
    5
}

/// Recommend movies for a free-text query
#[utoipa::path(
    post,
    path = "/api/v1/recommendations",
    tag = "recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Ranked matches", body = MatchesResponse),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 503, description = "Vector index unavailable", body = crate::error::ApiError)
    )
)]
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();
    let Json(req) = payload?;
    req.validate()?;

    let data = state.context.recommender().recommend(&req.query, req.k).await?;
    tracing::info!(k = req.k, hits = data.len(), "Recommendations served");

    Ok(Json(MatchesResponse {
        success: true,
        data,
    }))
}
