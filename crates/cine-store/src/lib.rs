//! Cine Store - Document store abstraction
//!
//! Provides abstraction over document databases (SurrealDB)
//! for persisting movie records, plus an in-process store for
//! local development and tests.

use async_trait::async_trait;
use cine_core::{Movie, MovieFields, Result, SentinelDocument};

/// Trait for document store operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every movie record in store-native order
    async fn list_movies(&self) -> Result<Vec<Movie>>;

    /// Persist a new movie under a freshly generated id
    async fn create_movie(&self, fields: &MovieFields) -> Result<Movie>;

    /// Upsert the sentinel document and read it back
    async fn write_sentinel(&self, sentinel: &SentinelDocument)
        -> Result<Option<SentinelDocument>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

pub mod memory;
pub mod surrealdb_store;

pub use memory::MemoryStore;
pub use surrealdb_store::SurrealDbStore;

/// Collection and key of the connectivity sentinel
pub const SENTINEL_COLLECTION: &str = "test";
pub const SENTINEL_KEY: &str = "connection";
