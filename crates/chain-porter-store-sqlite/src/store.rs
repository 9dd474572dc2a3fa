// chain-porter-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Text Store
// Description: Text record persistence with per-operation connections.
// Purpose: Provide save/get/list/delete over a single auto-created table.
// Dependencies: rusqlite, serde, thiserror, time
// ============================================================================

//! ## Overview
//! This module implements the local text store. Each operation opens a fresh
//! connection, runs inside the implicit rusqlite statement transaction, and
//! closes the connection before returning. The `texts` table is created on
//! open when absent. Listing orders newest first with the record id as the
//! tiebreak for same-millisecond inserts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout for store connections (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum total path length accepted for the database file.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Configuration for the `SQLite` text store.
#[derive(Debug, Clone, Deserialize)]
pub struct TextStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Returns the default busy timeout for store connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Text store errors.
#[derive(Debug, Error)]
pub enum TextStoreError {
    /// Store I/O error.
    #[error("text store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("text store db error: {0}")]
    Db(String),
    /// Invalid store data or configuration.
    #[error("text store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Persisted text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Auto-assigned record identifier.
    pub id: i64,
    /// Stored text content.
    pub content: String,
    /// Name associated with the content.
    pub filename: String,
    /// Creation time in unix milliseconds.
    pub created_at: i64,
    /// Last update time in unix milliseconds.
    pub updated_at: i64,
}

impl TextRecord {
    /// Renders the creation time as an RFC 3339 timestamp.
    #[must_use]
    pub fn created_at_rfc3339(&self) -> String {
        format_unix_millis(self.created_at)
    }
}

/// Formats unix milliseconds as RFC 3339, falling back to the raw value.
fn format_unix_millis(millis: i64) -> String {
    i128::from(millis)
        .checked_mul(1_000_000)
        .and_then(|nanos| OffsetDateTime::from_unix_timestamp_nanos(nanos).ok())
        .and_then(|stamp| stamp.format(&Rfc3339).ok())
        .unwrap_or_else(|| millis.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed text store with per-operation connections.
#[derive(Debug, Clone)]
pub struct TextStore {
    /// Store configuration.
    config: TextStoreConfig,
}

impl TextStore {
    /// Creates a text store rooted at the configured database path.
    ///
    /// # Errors
    ///
    /// Returns [`TextStoreError`] when the path is invalid or the parent
    /// directory cannot be created.
    pub fn new(config: TextStoreConfig) -> Result<Self, TextStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        Ok(Self {
            config,
        })
    }

    /// Saves a text record and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TextStoreError`] when the insert fails.
    pub fn save(&self, content: &str, filename: &str) -> Result<i64, TextStoreError> {
        let connection = self.open()?;
        let now = unix_millis();
        connection
            .execute(
                "INSERT INTO texts (content, filename, created_at, updated_at) VALUES (?1, ?2, \
                 ?3, ?4)",
                params![content, filename, now, now],
            )
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        Ok(connection.last_insert_rowid())
    }

    /// Fetches a text record by identifier.
    ///
    /// A missing record is a `None`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TextStoreError`] when the query fails.
    pub fn get(&self, id: i64) -> Result<Option<TextRecord>, TextStoreError> {
        let connection = self.open()?;
        connection
            .query_row(
                "SELECT id, content, filename, created_at, updated_at FROM texts WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()
            .map_err(|err| TextStoreError::Db(err.to_string()))
    }

    /// Lists all text records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TextStoreError`] when the query fails.
    pub fn list(&self) -> Result<Vec<TextRecord>, TextStoreError> {
        let connection = self.open()?;
        let mut statement = connection
            .prepare(
                "SELECT id, content, filename, created_at, updated_at FROM texts ORDER BY \
                 created_at DESC, id DESC",
            )
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map([], row_to_record)
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|err| TextStoreError::Db(err.to_string()))?);
        }
        Ok(records)
    }

    /// Deletes a text record by identifier.
    ///
    /// Returns whether a row was removed; deleting a missing id is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`TextStoreError`] when the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, TextStoreError> {
        let connection = self.open()?;
        let removed = connection
            .execute("DELETE FROM texts WHERE id = ?1", params![id])
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        Ok(removed > 0)
    }

    /// Opens a fresh connection and ensures the schema exists.
    fn open(&self) -> Result<Connection, TextStoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        let connection = Connection::open_with_flags(&self.config.path, flags)
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        connection
            .busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS texts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    content TEXT NOT NULL,
                    filename TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
            )
            .map_err(|err| TextStoreError::Db(err.to_string()))?;
        Ok(connection)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a result row to a text record.
fn row_to_record(row: &rusqlite::Row<'_>) -> Result<TextRecord, rusqlite::Error> {
    Ok(TextRecord {
        id: row.get(0)?,
        content: row.get(1)?,
        filename: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Validates the database path before any filesystem access.
fn validate_store_path(path: &Path) -> Result<(), TextStoreError> {
    if path.as_os_str().is_empty() {
        return Err(TextStoreError::Invalid("store path must be non-empty".to_string()));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(TextStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    Ok(())
}

/// Creates the parent directory for the database file when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), TextStoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|err| TextStoreError::Io(err.to_string()))?;
    }
    Ok(())
}

/// Returns the current time in unix milliseconds.
fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use tempfile::TempDir;

    use super::TextStore;
    use super::TextStoreConfig;

    /// Builds a store rooted in a fresh temp directory.
    fn store_in(dir: &TempDir) -> TextStore {
        TextStore::new(TextStoreConfig {
            path: dir.path().join("texts.db"),
            busy_timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn save_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = store.save("hello", "a.txt").unwrap();
        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.content, "hello");
        assert_eq!(record.filename, "a.txt");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn delete_then_get_yields_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = store.save("hello", "a.txt").unwrap();
        assert!(store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert!(!store.delete(id).unwrap());
    }

    #[test]
    fn list_returns_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let first = store.save("one", "1.txt").unwrap();
        let second = store.save("two", "2.txt").unwrap();
        let third = store.save("three", "3.txt").unwrap();
        let records = store.list().unwrap();
        assert_eq!(records.len(), 3);
        let ids: Vec<i64> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn list_is_idempotent_without_writes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save("one", "1.txt").unwrap();
        store.save("two", "2.txt").unwrap();
        let first_pass = store.list().unwrap();
        let second_pass = store.list().unwrap();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn missing_id_is_none_not_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get(9_999).unwrap().is_none());
    }
}
