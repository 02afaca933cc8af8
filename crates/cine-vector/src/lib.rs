//! Cine Vector - Vector index and embedding abstraction
//!
//! Provides abstraction over vector databases (Qdrant) and embedding
//! providers (Ollama, OpenAI) for indexing and searching movie texts.

use async_trait::async_trait;
use cine_core::{IndexedDocument, RawMatch, Result};

/// Trait for vector index operations
///
/// Scores returned by `query_nearest` are distances: lower is more similar.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the backing collection if it does not exist yet
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert or overwrite documents keyed by their id
    async fn upsert(&self, documents: &[IndexedDocument]) -> Result<()>;

    /// Find the `limit` nearest documents, closest first
    async fn query_nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<RawMatch>>;

    /// Vector dimension fixed at collection creation
    fn dimension(&self) -> usize;
}

pub mod cache;
pub mod embedding;
pub mod memory;
pub mod qdrant_store;
pub mod semantic;

pub use cache::CachedEmbedding;
pub use embedding::{create_embedding_client, EmbeddingClient, HashingEmbedding};
pub use memory::MemoryIndex;
pub use qdrant_store::QdrantStore;
pub use semantic::{create_vector_index, SemanticIndex};
