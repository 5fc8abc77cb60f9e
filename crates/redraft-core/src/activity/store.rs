//! SQLite-backed activity store
//!
//! Durable append-only persistence for publish-impact records. Records
//! are stored as JSON payloads with the key columns broken out and
//! indexed for the reporting query; rows are never updated or deleted.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::error::{ActivityError, ActivityResult};
use super::ActivityStore;
use crate::models::{ActivityKey, PublishImpactRecord};

/// Current schema version for migrations
const SCHEMA_VERSION: i32 = 1;

/// Durable store backed by SQLite
pub struct SqliteActivityStore {
    conn: Mutex<Connection>,
}

impl SqliteActivityStore {
    /// Open or create the database at the given path
    pub fn open(path: &Path) -> ActivityResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ActivityError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> ActivityResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn append_record(
        conn: &Connection,
        key: &ActivityKey,
        record: &PublishImpactRecord,
    ) -> ActivityResult<()> {
        let payload = serde_json::to_string(record)?;
        conn.execute(
            "INSERT INTO publish_impact (user, project, target_url, recorded_at, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key.user,
                key.project,
                key.target_url,
                record.timestamp.timestamp_millis(),
                payload
            ],
        )?;
        Ok(())
    }

    fn query_records(
        conn: &Connection,
        key: &ActivityKey,
        limit: usize,
    ) -> ActivityResult<Vec<PublishImpactRecord>> {
        let mut stmt = conn.prepare(
            "SELECT payload FROM publish_impact
             WHERE user = ?1 AND project = ?2 AND target_url = ?3
             ORDER BY recorded_at DESC, id DESC
             LIMIT ?4",
        )?;

        let rows = stmt.query_map(
            params![key.user, key.project, key.target_url, limit as i64],
            |row| row.get::<_, String>(0),
        )?;

        let mut records = Vec::new();
        for payload in rows {
            records.push(serde_json::from_str(&payload?)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn record(&self, key: &ActivityKey, record: &PublishImpactRecord) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| ActivityError::Poisoned)?;
        Self::append_record(&conn, key, record)?;
        Ok(())
    }

    async fn query(&self, key: &ActivityKey, limit: usize) -> Result<Vec<PublishImpactRecord>> {
        let conn = self.conn.lock().map_err(|_| ActivityError::Poisoned)?;
        Ok(Self::query_records(&conn, key, limit)?)
    }
}

/// Initialize the database schema
fn init_schema(conn: &Connection) -> ActivityResult<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Append-only publish-impact records
        CREATE TABLE IF NOT EXISTS publish_impact (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL,
            project TEXT NOT NULL,
            target_url TEXT NOT NULL,
            recorded_at INTEGER NOT NULL,
            payload TEXT NOT NULL
        );

        -- Reporting query: all records for one publish identity
        CREATE INDEX IF NOT EXISTS idx_publish_impact_key
            ON publish_impact(user, project, target_url);

        -- Query by recording time (for sorting/pruning)
        CREATE INDEX IF NOT EXISTS idx_publish_impact_recorded_at
            ON publish_impact(recorded_at);
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Check if schema needs initialization or migration
fn needs_init(conn: &Connection) -> bool {
    let table_exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_info'")
        .and_then(|mut stmt| stmt.exists([]))
        .unwrap_or(false);

    if !table_exists {
        return true;
    }

    let version: Option<i32> = conn
        .prepare("SELECT value FROM schema_info WHERE key = 'version'")
        .and_then(|mut stmt| stmt.query_row([], |row| row.get::<_, String>(0)))
        .ok()
        .and_then(|v| v.parse().ok());

    match version {
        Some(v) => v < SCHEMA_VERSION,
        None => true,
    }
}
