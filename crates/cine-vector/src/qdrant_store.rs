//! Qdrant implementation for vector storage
//!
//! Provides connection management and vector operations
//! for movie text embeddings.

use async_trait::async_trait;
use cine_core::{CineError, DatabaseConfig, IndexedDocument, RawMatch, Result};
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;

/// Qdrant vector store implementation
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantStore {
    /// Create a new Qdrant connection
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.qdrant_url())
            .build()
            .map_err(|e| CineError::IndexUnavailable(format!("Qdrant connection failed: {e}")))?;

        Ok(Self {
            client,
            collection: config.collection_name.clone(),
            dimension: config.vector_dimension,
        })
    }

    fn payload(document: &IndexedDocument) -> HashMap<String, Value> {
        HashMap::from([
            ("id".to_string(), Value::from(document.metadata.id.clone())),
            ("title".to_string(), Value::from(document.metadata.title.clone())),
            ("content".to_string(), Value::from(document.text.clone())),
        ])
    }
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[async_trait]
impl super::VectorIndex for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(|e| {
            CineError::IndexUnavailable(format!("Failed to list collections: {e}"))
        })?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| {
                    CineError::IndexUnavailable(format!("Failed to create collection: {e}"))
                })?;
            tracing::info!(
                collection = %self.collection,
                dimension = self.dimension,
                "Created Qdrant collection"
            );
        }

        Ok(())
    }

    async fn upsert(&self, documents: &[IndexedDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = documents
            .iter()
            .map(|doc| PointStruct::new(doc.id.clone(), doc.vector.clone(), Self::payload(doc)))
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| CineError::IndexUnavailable(format!("Failed to upsert vector: {e}")))?;

        Ok(())
    }

    async fn query_nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<RawMatch>> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| CineError::IndexUnavailable(format!("Vector search failed: {e}")))?;

        // Cosine collections score by similarity; report distance instead
        Ok(results
            .result
            .into_iter()
            .map(|point| RawMatch {
                id: payload_string(&point.payload, "id"),
                title: payload_string(&point.payload, "title"),
                distance: 1.0 - point.score,
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cine_core::MatchMetadata;

    #[test]
    fn test_payload_carries_metadata() {
        let doc = IndexedDocument {
            id: "id-1".to_string(),
            text: "Title: Alien\n".to_string(),
            vector: vec![0.0; 4],
            metadata: MatchMetadata {
                id: "id-1".to_string(),
                title: "Alien".to_string(),
            },
        };
        let payload = QdrantStore::payload(&doc);

        assert_eq!(payload_string(&payload, "id").as_deref(), Some("id-1"));
        assert_eq!(payload_string(&payload, "title").as_deref(), Some("Alien"));
        assert_eq!(payload_string(&payload, "missing"), None);
    }
}
