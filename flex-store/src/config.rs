//! Store Configuration
//!
//! Backend selection for the asset store. Supports loading from
//! environment variables with the FLEX_STORE_ prefix.

use std::env;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryAssetStore;
use crate::sled::SledAssetStore;
use crate::store::AssetStore;

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory backend (tests, development)
    Memory,
    /// Sled persistent backend
    Sled,
}

impl StoreBackend {
    /// Parse from string (for environment variables)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "sled" => Some(Self::Sled),
            _ => None,
        }
    }
}

/// Asset store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,
    /// Data directory for persistent backends
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sled,
            data_dir: "./flex_data".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create development configuration
    pub fn development() -> Self {
        Self {
            backend: StoreBackend::Sled,
            data_dir: "./flex_dev_data".to_string(),
        }
    }

    /// Create test configuration (in-memory)
    pub fn test() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_dir: String::new(),
        }
    }

    /// Apply FLEX_STORE_BACKEND / FLEX_STORE_DATA_DIR overrides
    pub fn from_env(mut self) -> Self {
        if let Ok(backend) = env::var("FLEX_STORE_BACKEND") {
            if let Some(parsed) = StoreBackend::from_str(&backend) {
                self.backend = parsed;
            }
        }
        if let Ok(dir) = env::var("FLEX_STORE_DATA_DIR") {
            self.data_dir = dir;
        }
        self
    }

    /// Open the configured backend
    pub fn open(&self) -> StoreResult<Arc<dyn AssetStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryAssetStore::new())),
            StoreBackend::Sled => {
                if self.data_dir.is_empty() {
                    return Err(StoreError::Config(
                        "sled backend requires a data_dir".to_string(),
                    ));
                }
                Ok(Arc::new(SledAssetStore::open(&self.data_dir)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(StoreBackend::from_str("memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::from_str("SLED"), Some(StoreBackend::Sled));
        assert_eq!(StoreBackend::from_str("couch"), None);
    }

    #[test]
    fn test_test_config_opens_memory() {
        let store = StoreConfig::test().open();
        assert!(store.is_ok());
    }

    #[test]
    fn test_sled_requires_data_dir() {
        let config = StoreConfig {
            backend: StoreBackend::Sled,
            data_dir: String::new(),
        };
        assert!(matches!(config.open(), Err(StoreError::Config(_))));
    }
}
