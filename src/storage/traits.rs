//! Storage traits and error types
//!
//! This module defines the trait interface for artifact sinks and the
//! associated error type.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid artifact key: '{0}'")]
    InvalidKey(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable key → bytes sink for crawl artifacts
///
/// Keys are relative `/`-separated paths such as `models/toyota.json`.
/// Storing under an existing key replaces the previous artifact.
#[async_trait]
pub trait Persister: Send + Sync {
    /// Durably stores `body` under `key`
    async fn store(&self, key: &str, body: Vec<u8>) -> StorageResult<()>;
}

/// Serializes `value` as JSON and stores it under `key`
pub async fn store_json<T>(persister: &dyn Persister, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(value)?;
    persister.store(key, body).await
}

/// Checks that `key` is a relative path without empty, `.` or `..` segments
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("brands.json").is_ok());
        assert!(validate_key("models/toyota.json").is_ok());
        assert!(validate_key("prices/toyota_camry.json").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        for key in [
            "",
            "/etc/passwd",
            "../escape.json",
            "models/../../x",
            "models//x.json",
            "models/.json/.",
            "models\\x.json",
            "prices/",
        ] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
