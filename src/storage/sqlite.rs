//! SQLite storage implementation
//!
//! Stores every artifact as a row of the `artifacts` table, keyed by its
//! artifact key.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{validate_key, Persister, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`, creating parent directories
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Writes `body` under `key`, replacing any previous artifact
    pub fn put(&self, key: &str, body: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO artifacts (key, body, stored_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body, stored_at = excluded.stored_at",
            params![key, body, now],
        )?;
        Ok(())
    }

    /// Reads the artifact stored under `key`
    pub fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let body = self
            .conn()?
            .query_row(
                "SELECT body FROM artifacts WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    /// All stored keys in lexical order
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM artifacts ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Number of stored artifacts
    pub fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM artifacts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl Persister for SqliteStorage {
    async fn store(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        self.put(key, &body)
    }
}
