//! Recommendation service
//!
//! Turns a free-text query into scored matches by delegating the
//! nearest-neighbour search to the semantic index.

use crate::text::{scored_match, similar_query_text};
use cine_core::{CineError, Movie, Result, ScoredMatch};
use cine_vector::SemanticIndex;

/// Similarity-based recommendations
#[derive(Clone)]
pub struct RecommendationService {
    index: Option<SemanticIndex>,
}

impl RecommendationService {
    pub fn new(index: Option<SemanticIndex>) -> Self {
        Self { index }
    }

    /// Whether a vector index is configured
    pub fn is_available(&self) -> bool {
        self.index.is_some()
    }

    /// Up to `k` matches for `query`, in the index's ranking order
    pub async fn recommend(&self, query: &str, k: usize) -> Result<Vec<ScoredMatch>> {
        let index = self.index.as_ref().ok_or_else(|| {
            CineError::IndexUnavailable("vector index not available".to_string())
        })?;

        if k == 0 {
            return Err(CineError::ValidationError("k must be at least 1".to_string()));
        }
        if query.trim().is_empty() {
            return Err(CineError::ValidationError("query required".to_string()));
        }

        let raw = index.search_with_distance(query, k).await?;
        tracing::debug!(k, hits = raw.len(), "Similarity search complete");

        Ok(raw.into_iter().take(k).map(scored_match).collect())
    }

    /// Movies similar to `movie`, excluding the movie itself
    ///
    /// Requests `k` neighbours before filtering, so fewer than `k` may come back.
    pub async fn similar_to(&self, movie: &Movie, k: usize) -> Result<Vec<ScoredMatch>> {
        let matches = self.recommend(&similar_query_text(movie), k).await?;
        Ok(matches.into_iter().filter(|m| m.id != movie.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use crate::testing::{semantic, StaticIndex};
    use cine_core::{MovieFields, RawMatch};
    use cine_store::MemoryStore;
    use cine_vector::{HashingEmbedding, MemoryIndex};
    use std::sync::Arc;

    fn raw(id: Option<&str>, title: Option<&str>, distance: f32) -> RawMatch {
        RawMatch {
            id: id.map(String::from),
            title: title.map(String::from),
            distance,
        }
    }

    fn static_service(matches: Vec<RawMatch>) -> RecommendationService {
        RecommendationService::new(Some(SemanticIndex::new(
            Arc::new(HashingEmbedding::new(8)),
            Arc::new(StaticIndex::new(8, matches)),
        )))
    }

    #[tokio::test]
    async fn test_no_index_fails() {
        let service = RecommendationService::new(None);
        let err = service.recommend("dream thief", 5).await.unwrap_err();
        assert!(matches!(err, CineError::IndexUnavailable(_)));
        assert!(!service.is_available());
    }

    #[tokio::test]
    async fn test_zero_k_rejected() {
        let service = static_service(vec![]);
        assert!(matches!(
            service.recommend("x", 0).await,
            Err(CineError::ValidationError(_))
        ));
        assert!(matches!(
            service.recommend("  ", 3).await,
            Err(CineError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_scores_preserve_order_and_truncate() {
        let service = static_service(vec![
            raw(Some("a"), Some("A"), 0.1),
            raw(Some("b"), Some("B"), 1.0),
            raw(Some("c"), Some("C"), 1.5),
            raw(None, None, 0.3),
        ]);

        let matches = service.recommend("anything", 3).await.unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].id, "a");
        assert_eq!(matches[0].similarity, 0.9);
        assert_eq!(matches[1].similarity, 0.0);
        assert_eq!(matches[2].similarity, 0.0);
        for m in &matches {
            assert!((0.0..=1.0).contains(&m.similarity));
        }
    }

    #[tokio::test]
    async fn test_missing_metadata_defaults() {
        let service = static_service(vec![raw(None, None, 0.5)]);
        let matches = service.recommend("anything", 1).await.unwrap();
        assert_eq!(matches[0].id, "unknown");
        assert_eq!(matches[0].title, "Unknown Title");
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let service = static_service(vec![
            raw(Some("a"), Some("A"), 0.2),
            raw(Some("a"), Some("A"), 0.2),
        ]);
        assert_eq!(service.recommend("anything", 5).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_added_movie_is_recommended() {
        let index = semantic(Arc::new(MemoryIndex::new(512)));
        let catalog = CatalogService::new(Some(Arc::new(MemoryStore::new())), Some(index.clone()));
        let service = RecommendationService::new(Some(index));

        let added = catalog
            .add_movie(
                MovieFields::new("Inception")
                    .with_description("A thief who steals secrets via dreams"),
            )
            .await
            .unwrap();
        assert!(added.is_indexed());

        let matches = service.recommend("dream thief", 5).await.unwrap();
        let hit = matches
            .iter()
            .find(|m| m.id == added.id)
            .expect("added movie should be recommended");
        assert_eq!(hit.title, "Inception");
        assert!(hit.similarity > 0.0);
    }

    #[tokio::test]
    async fn test_similar_to_excludes_self() {
        let index = semantic(Arc::new(MemoryIndex::new(512)));
        let catalog = CatalogService::new(Some(Arc::new(MemoryStore::new())), Some(index.clone()));
        let service = RecommendationService::new(Some(index));

        let heat = catalog
            .add_movie(MovieFields::new("Heat").with_description("A crew of bank robbers"))
            .await
            .unwrap();
        let other = catalog
            .add_movie(MovieFields::new("The Town").with_description("Bank robbers in Boston"))
            .await
            .unwrap();

        let matches = service.similar_to(&heat.movie, 3).await.unwrap();
        assert!(matches.iter().all(|m| m.id != heat.id));
        assert!(matches.iter().any(|m| m.id == other.id));
    }
}
