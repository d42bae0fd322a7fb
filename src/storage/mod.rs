//! Storage module for persisting crawl artifacts
//!
//! This module handles every write the crawler makes:
//! - The [`Persister`] trait, a key → bytes sink
//! - A file-tree backend producing the `brands.json` / `models/` / `prices/` layout
//! - A SQLite backend keeping one row per artifact
//! - An in-memory backend

mod files;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use files::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::{store_json, validate_key, Persister, StorageError, StorageResult};

use crate::config::{Backend, OutputConfig};
use std::path::Path;
use std::sync::Arc;

/// Opens the backend selected by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Persister>)` - Ready-to-use artifact sink
/// * `Err(StorageError)` - Failed to open the database
pub fn open_storage(config: &OutputConfig) -> StorageResult<Arc<dyn Persister>> {
    match config.backend {
        Backend::Files => Ok(Arc::new(FileStorage::new(&config.data_dir))),
        Backend::Sqlite => Ok(Arc::new(SqliteStorage::new(Path::new(
            &config.database_path,
        ))?)),
    }
}
