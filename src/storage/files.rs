//! File-tree storage implementation
//!
//! Each artifact key maps to a file below the data directory, which yields
//! the `brands.json`, `models/` and `prices/` layout consumers read.

use crate::storage::traits::{validate_key, Persister, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes artifacts as files under a root directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl Persister for FileStorage {
    async fn store(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        tracing::debug!(key, path = %path.display(), "Stored artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{store_json, StorageError};

    #[tokio::test]
    async fn test_store_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        store_json(&storage, "models/toyota.json", &vec!["a", "b"])
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("models/toyota.json")).unwrap();
        assert_eq!(written, r#"["a","b"]"#);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.store("brands.json", b"[1]".to_vec()).await.unwrap();
        storage.store("brands.json", b"[2]".to_vec()).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("brands.json")).unwrap();
        assert_eq!(written, "[2]");
    }

    #[tokio::test]
    async fn test_rejects_escaping_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        let result = storage.store("../outside.json", b"{}".to_vec()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert!(!dir.path().join("outside.json").exists());
    }
}
