//! In-Memory Store Backend
//!
//! RwLock-protected map backend, used by tests and development. Documents
//! keep their injected `assetType` tag so selector queries see exactly
//! what a document store would.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use flex_core::{Selector, ASSET_TYPE_FIELD};

use crate::error::{StoreError, StoreResult};
use crate::store::AssetStore;

/// Thread-safe in-memory asset store
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryAssetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all documents
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn tag_document(key: &str, asset_type: &str, mut value: Value) -> StoreResult<Value> {
    match value.as_object_mut() {
        Some(obj) => {
            obj.insert(ASSET_TYPE_FIELD.to_string(), Value::String(asset_type.to_string()));
            Ok(value)
        }
        None => Err(StoreError::Serialization(format!(
            "document {} is not a JSON object",
            key
        ))),
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let documents = self.documents.read().await;
        Ok(documents.get(key).cloned())
    }

    async fn put(&self, key: &str, asset_type: &str, value: Value) -> StoreResult<()> {
        let tagged = tag_document(key, asset_type, value)?;
        let mut documents = self.documents.write().await;
        documents.insert(key.to_string(), tagged);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let documents = self.documents.read().await;
        Ok(documents.contains_key(key))
    }

    async fn query(&self, asset_type: &str, selector: &Selector) -> StoreResult<Vec<Value>> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|doc| {
                doc.get(ASSET_TYPE_FIELD).and_then(Value::as_str) == Some(asset_type)
                    && selector.matches(doc)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryAssetStore::new();
        store
            .put("S1", "site", json!({"siteId": "S1", "voltageType": "MV"}))
            .await
            .unwrap();

        let doc = store.get("S1").await.unwrap().unwrap();
        assert_eq!(doc["siteId"], "S1");
        assert_eq!(doc["assetType"], "site");
        assert!(store.exists("S1").await.unwrap());
        assert!(!store.exists("S2").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_scoped_by_type() {
        let store = MemoryAssetStore::new();
        store.put("S1", "site", json!({"siteId": "S1"})).await.unwrap();
        store.put("B1", "bid", json!({"bidId": "B1"})).await.unwrap();

        let sites = store.query("site", &Selector::new()).await.unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0]["siteId"], "S1");
    }

    #[tokio::test]
    async fn test_query_applies_selector() {
        let store = MemoryAssetStore::new();
        store
            .put("S1", "site", json!({"siteId": "S1", "a04RegisteredResourceMrid": "dso-a"}))
            .await
            .unwrap();
        store
            .put("S2", "site", json!({"siteId": "S2", "a04RegisteredResourceMrid": "dso-b"}))
            .await
            .unwrap();

        let selector = Selector::new().eq("a04RegisteredResourceMrid", "dso-a");
        let result = store.query("site", &selector).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["siteId"], "S1");
    }

    #[tokio::test]
    async fn test_non_object_document_rejected() {
        let store = MemoryAssetStore::new();
        let err = store.put("X", "site", json!("scalar")).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
