//! In-process document store
//!
//! Keeps records in memory in insertion order. Used for local
//! development (`STORE_BACKEND=memory`) and tests.

use async_trait::async_trait;
use cine_core::{CineError, Movie, MovieFields, Result, SentinelDocument};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    movies: RwLock<Vec<Movie>>,
    sentinel: RwLock<Option<SentinelDocument>>,
    writes: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes (movies and sentinel)
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Simulate an unreachable store
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CineError::StoreUnavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl super::DocumentStore for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.ensure_online()?;
        Ok(self.movies.read().await.clone())
    }

    async fn create_movie(&self, fields: &MovieFields) -> Result<Movie> {
        self.ensure_online()?;
        let movie = Movie::create(fields.clone());
        self.movies.write().await.push(movie.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(id = %movie.id, "Stored movie in memory");
        Ok(movie)
    }

    async fn write_sentinel(
        &self,
        sentinel: &SentinelDocument,
    ) -> Result<Option<SentinelDocument>> {
        self.ensure_online()?;
        let mut slot = self.sentinel.write().await;
        *slot = Some(sentinel.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(slot.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStore;

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = MemoryStore::new();
        assert!(store.list_movies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.create_movie(&MovieFields::new("Heat")).await.unwrap();
        let b = store.create_movie(&MovieFields::new("Heat")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.write_count(), 2);

        let listed = store.list_movies().await.unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);

        let err = store.list_movies().await.unwrap_err();
        assert!(matches!(err, CineError::StoreUnavailable(_)));
        assert!(store.create_movie(&MovieFields::new("X")).await.is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_sentinel_read_back() {
        let store = MemoryStore::new();
        let sentinel = SentinelDocument::now();
        let stored = store.write_sentinel(&sentinel).await.unwrap();
        assert_eq!(stored, Some(sentinel));
    }
}
