//! Connectivity probe

use crate::catalog::store_missing;
use cine_core::{Result, SentinelDocument, StoreHealth};
use cine_store::DocumentStore;
use std::sync::Arc;

/// Confirms the document store is reachable and writable
#[derive(Clone)]
pub struct ConnectivityProbe {
    store: Option<Arc<dyn DocumentStore>>,
}

impl ConnectivityProbe {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    /// Write the sentinel document and read it back
    pub async fn check_store_health(&self) -> Result<StoreHealth> {
        let store = self.store.as_ref().ok_or_else(store_missing)?;
        let data = store.write_sentinel(&SentinelDocument::now()).await?;

        tracing::debug!(backend = store.name(), "Store probe succeeded");
        Ok(StoreHealth {
            message: "Document store connection successful".to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cine_core::CineError;
    use cine_store::MemoryStore;

    #[tokio::test]
    async fn test_probe_writes_sentinel() {
        let store = Arc::new(MemoryStore::new());
        let probe = ConnectivityProbe::new(Some(store.clone()));

        let health = probe.check_store_health().await.unwrap();
        assert_eq!(
            health.data.map(|d| d.message),
            Some("Connection successful".to_string())
        );
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_probe_reports_offline_store() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let probe = ConnectivityProbe::new(Some(store));

        assert!(matches!(
            probe.check_store_health().await,
            Err(CineError::StoreUnavailable(_))
        ));
        assert!(ConnectivityProbe::new(None)
            .check_store_health()
            .await
            .is_err());
    }
}
