//! Text-level semantic index
//!
//! Pairs an embedding client with a vector index so callers work in
//! terms of text: index a text under an id, search by a text query.

use crate::cache::CachedEmbedding;
use crate::embedding::{create_embedding_client, EmbeddingClient};
use crate::memory::MemoryIndex;
use crate::qdrant_store::QdrantStore;
use crate::VectorIndex;
use cine_core::{
    AppConfig, CineError, DatabaseConfig, IndexedDocument, MatchMetadata, RawMatch, Result,
    VectorBackend,
};
use std::sync::Arc;

/// Create the configured vector index
pub fn create_vector_index(config: &DatabaseConfig) -> Result<Arc<dyn VectorIndex>> {
    match config.vector_backend {
        VectorBackend::Qdrant => Ok(Arc::new(QdrantStore::new(config)?)),
        VectorBackend::Memory => Ok(Arc::new(MemoryIndex::new(config.vector_dimension))),
    }
}

/// Embedding provider + vector index
#[derive(Clone)]
pub struct SemanticIndex {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
}

impl SemanticIndex {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Build from config and make sure the collection exists
    ///
    /// Fails with `DimensionMismatch` when the embedder cannot produce
    /// vectors of the collection's dimension.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let index = create_vector_index(&config.database)?;

        let embedder: Arc<dyn EmbeddingClient> = Arc::from(create_embedding_client(
            &config.embedding,
            config.database.vector_dimension,
        )?);
        let embedder: Arc<dyn EmbeddingClient> = if config.embedding.cache_capacity > 0 {
            Arc::new(CachedEmbedding::new(
                embedder,
                config.embedding.cache_capacity,
            ))
        } else {
            embedder
        };

        if embedder.dimension() != index.dimension() {
            tracing::warn!(
                model = embedder.model(),
                embedding_dimension = embedder.dimension(),
                index_dimension = index.dimension(),
                "Embedding dimension does not match the vector collection"
            );
            return Err(CineError::DimensionMismatch {
                expected: index.dimension(),
                got: embedder.dimension(),
            });
        }

        let semantic = Self::new(embedder, index);
        semantic.index.ensure_collection().await?;
        Ok(semantic)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        let expected = self.index.dimension();
        if vector.len() != expected {
            return Err(CineError::DimensionMismatch {
                expected,
                got: vector.len(),
            });
        }
        Ok(())
    }

    /// Embed `text` and upsert it under `metadata.id`
    pub async fn add_text(&self, text: String, metadata: MatchMetadata) -> Result<()> {
        let vector = self.embedder.embed(&text).await?;
        self.check_dimension(&vector)?;

        let document = IndexedDocument {
            id: metadata.id.clone(),
            text,
            vector,
            metadata,
        };
        self.index.upsert(std::slice::from_ref(&document)).await?;

        tracing::debug!(id = %document.id, "Indexed movie text");
        Ok(())
    }

    /// The `k` nearest indexed texts to `query`, with distances
    pub async fn search_with_distance(&self, query: &str, k: usize) -> Result<Vec<RawMatch>> {
        let vector = self.embedder.embed(query).await?;
        self.check_dimension(&vector)?;
        self.index.query_nearest(&vector, k).await
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingClient> {
        &self.embedder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedding;
    use cine_core::{EmbeddingProvider, StoreBackend};

    fn memory_config(dimension: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.store_backend = StoreBackend::Memory;
        config.database.vector_backend = VectorBackend::Memory;
        config.database.vector_dimension = dimension;
        config.embedding.provider = EmbeddingProvider::Hashing;
        config
    }

    fn metadata(id: &str, title: &str) -> MatchMetadata {
        MatchMetadata {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_memory_backends() {
        let semantic = SemanticIndex::open(&memory_config(64)).await.unwrap();
        assert_eq!(semantic.index().dimension(), 64);
        assert_eq!(semantic.embedder().dimension(), 64);
    }

    #[tokio::test]
    async fn test_open_rejects_mismatched_embedder() {
        let mut config = memory_config(64);
        config.embedding.dimension = Some(32);
        assert!(matches!(
            SemanticIndex::open(&config).await,
            Err(CineError::DimensionMismatch {
                expected: 64,
                got: 32
            })
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_default_ollama_against_default_collection() {
        // nomic-embed-text is 768-dim, the default collection is 512
        let mut config = AppConfig::default();
        config.database.vector_backend = VectorBackend::Memory;
        assert!(matches!(
            SemanticIndex::open(&config).await,
            Err(CineError::DimensionMismatch {
                expected: 512,
                got: 768
            })
        ));

        config.database.vector_dimension = 768;
        assert!(SemanticIndex::open(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_then_search() {
        let semantic = SemanticIndex::new(
            Arc::new(HashingEmbedding::new(128)),
            Arc::new(MemoryIndex::new(128)),
        );
        semantic
            .add_text("Title: Heat\nGenre: Crime\n".to_string(), metadata("1", "Heat"))
            .await
            .unwrap();

        let hits = semantic.search_with_distance("crime", 3).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_deref(), Some("1"));
        assert!(hits[0].distance < 1.0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_reported() {
        let semantic = SemanticIndex::new(
            Arc::new(HashingEmbedding::new(16)),
            Arc::new(MemoryIndex::new(32)),
        );
        let err = semantic
            .add_text("Title: Heat\n".to_string(), metadata("1", "Heat"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CineError::DimensionMismatch {
                expected: 32,
                got: 16
            }
        ));
    }
}
