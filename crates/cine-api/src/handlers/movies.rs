//! Movie catalog handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cine_core::{Movie, MovieFields, ScoredMatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Movie list response
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListResponse {
    pub success: bool,
    pub data: Vec<Movie>,
}

/// List every movie in the catalog
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    tag = "movies",
    responses(
        (status = 200, description = "All catalogued movies", body = MovieListResponse),
        (status = 503, description = "Document store unavailable", body = crate::error::ApiError)
    )
)]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let data = state.context.catalog().list_movies().await?;
    Ok(Json(MovieListResponse {
        success: true,
        data,
    }))
}

/// Add movie request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMovieRequest {
    #[validate(length(min = 1, message = "title required"))]
    #[schema(example = "Inception")]
    pub title: String,
    #[schema(example = "A thief who steals secrets via dreams")]
    pub description: Option<String>,
    #[schema(example = "Sci-Fi")]
    pub genre: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    #[schema(example = 2010)]
    pub year: Option<i32>,
}

impl From<AddMovieRequest> for MovieFields {
    fn from(req: AddMovieRequest) -> Self {
        MovieFields {
            title: req.title,
            description: req.description,
            genre: req.genre,
            year: req.year,
        }
    }
}

/// Add movie response
#[derive(Debug, Serialize, ToSchema)]
pub struct AddMovieResponse {
    pub success: bool,
    pub id: String,
    pub data: Movie,
    /// Set when the movie was stored but could not be indexed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Add a movie to the catalog and index it
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    tag = "movies",
    request_body = AddMovieRequest,
    responses(
        (status = 201, description = "Movie stored", body = AddMovieResponse),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 503, description = "Document store unavailable", body = crate::error::ApiError)
    )
)]
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddMovieRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();
    let Json(req) = payload?;
    req.validate()?;

    let added = state.context.catalog().add_movie(req.into()).await?;
    let response = AddMovieResponse {
        success: true,
        id: added.id,
        data: added.movie,
        warning: added.warning.map(|w| w.message),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Similar movies query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SimilarParams {
    /// Number of neighbours to request (default 3)
    pub k: Option<usize>,
}

/// Scored matches response
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchesResponse {
    pub success: bool,
    pub data: Vec<ScoredMatch>,
}

/// Movies similar to a catalogued movie, excluding the movie itself
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}/similar",
    tag = "movies",
    params(
        ("id" = String, Path, description = "Movie id"),
        SimilarParams
    ),
    responses(
        (status = 200, description = "Similar movies", body = MatchesResponse),
        (status = 404, description = "Movie not found", body = crate::error::ApiError),
        (status = 503, description = "Store or index unavailable", body = crate::error::ApiError)
    )
)]
pub async fn similar_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let k = params.k.unwrap_or(3);
    let data = state.context.similar_movies(&id, k).await?;
    tracing::debug!(%id, k, hits = data.len(), "Similar movies");

    Ok(Json(MatchesResponse {
        success: true,
        data,
    }))
}
