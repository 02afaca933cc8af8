//! API route definitions

use crate::handlers::{admin, movies, recommendations};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog endpoints
        .route("/movies", get(movies::list_movies).post(movies::add_movie))
        .route("/movies/:id/similar", get(movies::similar_movies))
        // Recommendation endpoints
        .route("/recommendations", post(recommendations::recommend))
        // Admin endpoints
        .route("/admin/connection-test", post(admin::connection_test))
}
