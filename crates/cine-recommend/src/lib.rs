//! Cine Recommend - Catalog and recommendation services
//!
//! This crate composes the document store, embedding provider and
//! vector index into the operations the presentation layer calls:
//! - Catalog: list movies, add a movie (store write + best-effort indexing)
//! - Recommendations: free-text and "more like this" similarity search
//! - Connectivity probe for the status page
//!
//! Collaborators are held in an explicit [`MovieContext`] built once at
//! start-up; a collaborator that failed to connect is simply absent and the
//! operations that need it report it as unavailable.

use cine_core::{AppConfig, Result, ScoredMatch, StoreBackend, SystemStatus};
use cine_store::{DocumentStore, MemoryStore, SurrealDbStore};
use cine_vector::{HashingEmbedding, MemoryIndex, SemanticIndex};
use std::sync::Arc;

pub mod catalog;
pub mod probe;
pub mod recommend;
pub mod text;

pub use catalog::CatalogService;
pub use probe::ConnectivityProbe;
pub use recommend::RecommendationService;
pub use text::{movie_text, scored_match, similar_query_text, similarity_from_distance};

// ============================================================================
// Dependency Context
// ============================================================================

/// External collaborators shared by every service
#[derive(Clone)]
pub struct MovieContext {
    store: Option<Arc<dyn DocumentStore>>,
    index: Option<SemanticIndex>,
}

impl MovieContext {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, index: Option<SemanticIndex>) -> Self {
        Self { store, index }
    }

    /// Connect to the configured backends
    ///
    /// Connection failures are logged and leave the collaborator unset.
    pub async fn connect(config: &AppConfig) -> Self {
        let store: Option<Arc<dyn DocumentStore>> = match config.database.store_backend {
            StoreBackend::Memory => Some(Arc::new(MemoryStore::new())),
            StoreBackend::SurrealDb => match SurrealDbStore::new(&config.database).await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!("Document store not available: {}", e);
                    None
                }
            },
        };

        let index = match SemanticIndex::open(config).await {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!("Vector store not available: {}", e);
                None
            }
        };

        tracing::info!(
            store = store.as_ref().map(|s| s.name()).unwrap_or("none"),
            index = index.is_some(),
            "Movie context ready"
        );
        Self { store, index }
    }

    /// Fully in-process context with the offline hashing embedder
    pub fn in_memory(dimension: usize) -> Self {
        let index = SemanticIndex::new(
            Arc::new(HashingEmbedding::new(dimension)),
            Arc::new(MemoryIndex::new(dimension)),
        );
        Self::new(Some(Arc::new(MemoryStore::new())), Some(index))
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.store.clone(), self.index.clone())
    }

    pub fn recommender(&self) -> RecommendationService {
        RecommendationService::new(self.index.clone())
    }

    pub fn probe(&self) -> ConnectivityProbe {
        ConnectivityProbe::new(self.store.clone())
    }

    /// "More like this" for a catalogued movie
    pub async fn similar_movies(&self, id: &str, k: usize) -> Result<Vec<ScoredMatch>> {
        let movie = self.catalog().find_movie(id).await?;
        self.recommender().similar_to(&movie, k).await
    }

    /// Reachability of both collaborators
    pub async fn status(&self) -> SystemStatus {
        let probe = self.probe().check_store_health().await;
        SystemStatus {
            store_connected: probe.is_ok(),
            store_error: probe.err().map(|e| e.to_string()),
            index_available: self.index.is_some(),
        }
    }
}

// ============================================================================
// Test doubles
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use cine_core::{CineError, IndexedDocument, RawMatch, Result};
    use cine_vector::{HashingEmbedding, MemoryIndex, SemanticIndex, VectorIndex};
    use std::sync::Arc;

    /// Hashing embedder sized to the given memory index
    pub fn semantic(index: Arc<MemoryIndex>) -> SemanticIndex {
        let dimension = index.dimension();
        SemanticIndex::new(Arc::new(HashingEmbedding::new(dimension)), index)
    }

    /// Index whose writes always fail
    pub struct FailingIndex {
        dimension: usize,
    }

    impl FailingIndex {
        pub fn new(dimension: usize) -> Self {
            Self { dimension }
        }
    }

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn ensure_collection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, _documents: &[IndexedDocument]) -> Result<()> {
            Err(CineError::IndexUnavailable("upsert refused".to_string()))
        }

        async fn query_nearest(&self, _vector: &[f32], _limit: usize) -> Result<Vec<RawMatch>> {
            Ok(Vec::new())
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    /// Index returning a fixed hit list regardless of the query or limit
    pub struct StaticIndex {
        dimension: usize,
        matches: Vec<RawMatch>,
    }

    impl StaticIndex {
        pub fn new(dimension: usize, matches: Vec<RawMatch>) -> Self {
            Self { dimension, matches }
        }
    }

    #[async_trait]
    impl VectorIndex for StaticIndex {
        async fn ensure_collection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, _documents: &[IndexedDocument]) -> Result<()> {
            Ok(())
        }

        async fn query_nearest(&self, _vector: &[f32], _limit: usize) -> Result<Vec<RawMatch>> {
            Ok(self.matches.clone())
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }
}
