//! In-memory storage implementation

use crate::storage::traits::{validate_key, Persister, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Keeps artifacts in a map; useful for embedding the crawler and for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    artifacts: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn artifacts(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.artifacts.lock().map_err(|_| StorageError::LockPoisoned)
    }

    pub fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.artifacts()?.get(key).cloned())
    }

    /// Parses the artifact under `key` as JSON
    pub fn get_json(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        match self.get(key)? {
            Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
            None => Ok(None),
        }
    }

    /// All stored keys in lexical order
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.artifacts()?.keys().cloned().collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.artifacts()
            .map(|artifacts| artifacts.contains_key(key))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Persister for MemoryStorage {
    async fn store(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        validate_key(key)?;
        self.artifacts()?.insert(key.to_string(), body);
        Ok(())
    }
}
