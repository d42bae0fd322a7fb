//! Database schema for the SQLite artifact backend

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per artifact key; re-storing a key replaces its body
CREATE TABLE IF NOT EXISTS artifacts (
    key TEXT PRIMARY KEY,
    body BLOB NOT NULL,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_artifacts_stored_at ON artifacts(stored_at);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
