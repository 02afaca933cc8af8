//! In-process vector index
//!
//! Brute-force cosine search over an in-memory collection. Used for
//! local development (`VECTOR_BACKEND=memory`) and tests.

use async_trait::async_trait;
use cine_core::{CineError, IndexedDocument, RawMatch, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Cosine distance: `1 - cosine_similarity`. Range: \[0, 2\].
///
/// Zero vectors are treated as maximally dissimilar to everything.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// In-memory vector index
pub struct MemoryIndex {
    dimension: usize,
    documents: RwLock<Vec<IndexedDocument>>,
    upserts: AtomicU64,
    offline: AtomicBool,
}

impl MemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            documents: RwLock::new(Vec::new()),
            upserts: AtomicU64::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Number of documents upserted so far
    pub fn upsert_count(&self) -> u64 {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Number of distinct documents held
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Simulate an unreachable index
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CineError::IndexUnavailable(
                "memory index is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl super::VectorIndex for MemoryIndex {
    async fn ensure_collection(&self) -> Result<()> {
        self.ensure_online()
    }

    async fn upsert(&self, documents: &[IndexedDocument]) -> Result<()> {
        self.ensure_online()?;

        if let Some(doc) = documents.iter().find(|d| d.vector.len() != self.dimension) {
            return Err(CineError::DimensionMismatch {
                expected: self.dimension,
                got: doc.vector.len(),
            });
        }

        let mut stored = self.documents.write().await;
        for doc in documents {
            match stored.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => stored.push(doc.clone()),
            }
            self.upserts.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn query_nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<RawMatch>> {
        self.ensure_online()?;

        let stored = self.documents.read().await;
        let mut scored: Vec<RawMatch> = stored
            .iter()
            .map(|doc| RawMatch {
                id: Some(doc.metadata.id.clone()),
                title: Some(doc.metadata.title.clone()),
                distance: cosine_distance(vector, &doc.vector),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(limit);
        Ok(scored)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VectorIndex;
    use cine_core::MatchMetadata;

    fn doc(id: &str, vector: Vec<f32>) -> IndexedDocument {
        IndexedDocument {
            id: id.to_string(),
            text: format!("Title: {id}\n"),
            vector,
            metadata: MatchMetadata {
                id: id.to_string(),
                title: id.to_string(),
            },
        }
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[tokio::test]
    async fn test_query_orders_by_distance() {
        let index = MemoryIndex::new(2);
        index
            .upsert(&[doc("far", vec![0.0, 1.0]), doc("near", vec![1.0, 0.1])])
            .await
            .unwrap();

        let hits = index.query_nearest(&[1.0, 0.0], 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id.as_deref(), Some("near"));
        assert!(hits[0].distance < hits[1].distance);

        let top = index.query_nearest(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_same_id_overwrites() {
        let index = MemoryIndex::new(2);
        index.upsert(&[doc("a", vec![1.0, 0.0])]).await.unwrap();
        index.upsert(&[doc("a", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(index.len().await, 1);
        assert_eq!(index.upsert_count(), 2);
    }

    #[tokio::test]
    async fn test_wrong_dimension_rejected() {
        let index = MemoryIndex::new(3);
        let err = index.upsert(&[doc("a", vec![1.0])]).await.unwrap_err();
        assert!(matches!(
            err,
            CineError::DimensionMismatch {
                expected: 3,
                got: 1
            }
        ));
        assert!(index.is_empty().await);
    }
}
