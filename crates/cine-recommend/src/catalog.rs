//! Catalog service
//!
//! Persists movie records and keeps their indexed representation in step.
//! The document store write is authoritative; indexing is best-effort and
//! reported as a [`PartialWriteWarning`] when it fails.

use crate::text::movie_text;
use cine_core::{
    AddedMovie, CineError, MatchMetadata, Movie, MovieFields, PartialWriteWarning, Result,
};
use cine_store::DocumentStore;
use cine_vector::SemanticIndex;
use std::sync::Arc;

/// Error reported when no document store is connected
pub(crate) fn store_missing() -> CineError {
    CineError::StoreUnavailable("document store not connected".to_string())
}

/// Movie catalog operations
#[derive(Clone)]
pub struct CatalogService {
    store: Option<Arc<dyn DocumentStore>>,
    index: Option<SemanticIndex>,
}

impl CatalogService {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, index: Option<SemanticIndex>) -> Self {
        Self { store, index }
    }

    fn store(&self) -> Result<&Arc<dyn DocumentStore>> {
        self.store.as_ref().ok_or_else(store_missing)
    }

    /// Every movie in the catalog
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let movies = self.store()?.list_movies().await?;
        tracing::debug!(count = movies.len(), "Listed movies");
        Ok(movies)
    }

    /// Look a movie up by id via a catalog scan
    pub async fn find_movie(&self, id: &str) -> Result<Movie> {
        self.list_movies()
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CineError::NotFound(format!("movie {id}")))
    }

    /// Store a movie, then index it for similarity search
    pub async fn add_movie(&self, fields: MovieFields) -> Result<AddedMovie> {
        if !fields.has_title() {
            return Err(CineError::ValidationError("title required".to_string()));
        }

        let movie = self.store()?.create_movie(&fields).await?;
        let warning = self.index_movie(&movie).await.err();

        if let Some(warning) = &warning {
            tracing::warn!(id = %movie.id, "{}", warning);
        } else {
            tracing::info!(id = %movie.id, title = %movie.fields.title, "Added movie");
        }

        Ok(AddedMovie {
            id: movie.id.clone(),
            movie,
            warning,
        })
    }

    async fn index_movie(&self, movie: &Movie) -> std::result::Result<(), PartialWriteWarning> {
        let index = self.index.as_ref().ok_or_else(|| {
            PartialWriteWarning::new("Added to catalog but vector index is not available")
        })?;

        let metadata = MatchMetadata {
            id: movie.id.clone(),
            title: movie.fields.title.clone(),
        };

        index
            .add_text(movie_text(&movie.fields), metadata)
            .await
            .map_err(|e| {
                PartialWriteWarning::new(format!("Added to catalog but indexing failed: {e}"))
            })
    }
}
