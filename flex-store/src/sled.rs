//! Sled Store Backend
//!
//! Persistent reference backend over a sled tree. Documents are stored as
//! JSON bytes under their ledger key; queries scan the tree and evaluate
//! the shared selector, exactly like the in-memory backend.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use flex_core::{Selector, ASSET_TYPE_FIELD};

use crate::error::{StoreError, StoreResult};
use crate::store::AssetStore;

const ASSETS_TREE: &str = "assets";

/// Sled-backed asset store
#[derive(Debug, Clone)]
pub struct SledAssetStore {
    db: sled::Db,
    assets: sled::Tree,
}

impl SledAssetStore {
    /// Open or create a sled database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)
            .map_err(|e| StoreError::backend(format!("failed to open sled db: {}", e)))?;
        let assets = db
            .open_tree(ASSETS_TREE)
            .map_err(|e| StoreError::backend(format!("failed to open assets tree: {}", e)))?;
        Ok(Self { db, assets })
    }

    /// Flush outstanding writes to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db
            .flush()
            .map_err(|e| StoreError::backend(format!("flush failed: {}", e)))?;
        Ok(())
    }

    fn decode(key: &[u8], bytes: &[u8]) -> StoreResult<Value> {
        serde_json::from_slice(bytes).map_err(|e| {
            StoreError::Serialization(format!(
                "corrupt document {}: {}",
                String::from_utf8_lossy(key),
                e
            ))
        })
    }
}

#[async_trait]
impl AssetStore for SledAssetStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let entry = self
            .assets
            .get(key.as_bytes())
            .map_err(|e| StoreError::backend(e.to_string()))?;
        match entry {
            Some(bytes) => Ok(Some(Self::decode(key.as_bytes(), &bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, asset_type: &str, mut value: Value) -> StoreResult<()> {
        let obj = value.as_object_mut().ok_or_else(|| {
            StoreError::Serialization(format!("document {} is not a JSON object", key))
        })?;
        obj.insert(
            ASSET_TYPE_FIELD.to_string(),
            Value::String(asset_type.to_string()),
        );
        let bytes = serde_json::to_vec(&value)?;
        self.assets
            .insert(key.as_bytes(), bytes)
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.assets
            .contains_key(key.as_bytes())
            .map_err(|e| StoreError::backend(e.to_string()))
    }

    async fn query(&self, asset_type: &str, selector: &Selector) -> StoreResult<Vec<Value>> {
        let mut matches = Vec::new();
        for entry in self.assets.iter() {
            let (key, bytes) = entry.map_err(|e| StoreError::backend(e.to_string()))?;
            let doc = Self::decode(&key, &bytes)?;
            if doc.get(ASSET_TYPE_FIELD).and_then(Value::as_str) == Some(asset_type)
                && selector.matches(&doc)
            {
                matches.push(doc);
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sled_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SledAssetStore::open(dir.path()).unwrap();

        store
            .put("B1", "bid", json!({"bidId": "B1", "edaRegisteredResourceId": "eda-1"}))
            .await
            .unwrap();

        let doc = store.get("B1").await.unwrap().unwrap();
        assert_eq!(doc["bidId"], "B1");
        assert_eq!(doc["assetType"], "bid");
    }

    #[tokio::test]
    async fn test_sled_persistence() {
        let dir = tempdir().unwrap();

        {
            let store = SledAssetStore::open(dir.path()).unwrap();
            store.put("S1", "site", json!({"siteId": "S1"})).await.unwrap();
            store.flush().unwrap();
        }

        {
            let store = SledAssetStore::open(dir.path()).unwrap();
            assert!(store.exists("S1").await.unwrap());
            let sites = store.query("site", &Selector::new()).await.unwrap();
            assert_eq!(sites.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_sled_query_selector() {
        let dir = tempdir().unwrap();
        let store = SledAssetStore::open(dir.path()).unwrap();

        store
            .put("M1", "meteringRecordMV", json!({"meteringId": "M1", "siteId": "S1", "timeIntervalEnd": "2000"}))
            .await
            .unwrap();
        store
            .put("M2", "meteringRecordMV", json!({"meteringId": "M2", "siteId": "S1", "timeIntervalEnd": "900"}))
            .await
            .unwrap();

        let selector = Selector::new().eq("siteId", "S1").gte("timeIntervalEnd", "1000");
        let result = store.query("meteringRecordMV", &selector).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["meteringId"], "M1");
    }
}
