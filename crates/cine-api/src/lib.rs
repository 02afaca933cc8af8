//! Cine API - REST server
//!
//! HTTP endpoints for browsing the catalog, adding movies and asking for
//! recommendations. Every body is a `success`-tagged envelope.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use handlers::{admin, health, movies, recommendations};
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cine API",
        description = "Movie catalog and similarity recommendations"
    ),
    paths(
        health::health_check,
        health::system_status,
        movies::list_movies,
        movies::add_movie,
        movies::similar_movies,
        recommendations::recommend,
        admin::connection_test,
    ),
    components(schemas(
        cine_core::Movie,
        cine_core::MovieFields,
        cine_core::ScoredMatch,
        cine_core::SentinelDocument,
        cine_core::SystemStatus,
        error::ApiError,
        health::HealthResponse,
        health::StatusResponse,
        movies::MovieListResponse,
        movies::AddMovieRequest,
        movies::AddMovieResponse,
        movies::MatchesResponse,
        recommendations::RecommendationRequest,
        admin::ConnectionTestResponse,
    )),
    tags(
        (name = "health", description = "Liveness and collaborator status"),
        (name = "movies", description = "Movie catalog"),
        (name = "recommendations", description = "Similarity search"),
        (name = "admin", description = "Operational checks")
    )
)]
pub struct ApiDoc;

/// CORS policy; an empty origin list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/status", get(health::system_status))
        .nest("/api/v1", routes::api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Router over the given collaborators with default configuration
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_with_context(context: cine_recommend::MovieContext) -> Router {
    let config = cine_core::AppConfig::default();
    create_router(Arc::new(AppState::new(config, context)))
}

/// Router backed by in-memory store, index and the offline embedder
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    let dimension = cine_core::AppConfig::default().database.vector_dimension;
    create_router_with_context(cine_recommend::MovieContext::in_memory(dimension))
}
