//! Durable key-value persistence behind the [`StoragePort`] trait.
//!
//! The memory collection and the vector collection are each persisted as one
//! logical JSON record per key. [`SqliteStorage`] is the durable
//! implementation (single `kv` table, WAL); [`MemStorage`] backs tests and
//! ephemeral sessions. Swapping in a file or another embedded database only
//! requires implementing the trait.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Persistence port: one opaque string value per key.
///
/// Load failures are expected to be handled fail-open by callers (log and
/// start empty); save failures propagate so the caller knows the mutation is
/// not durable.
pub trait StoragePort: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed storage: a single `kv` table in one database file.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at the given path with the `kv` table
    /// initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::StorageLoad(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::StorageLoad(format!("failed to open database at {}: {e}", path.display()))
        })?;

        // WAL mode for better concurrent read performance
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| Error::StorageLoad(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|e| Error::StorageLoad(e.to_string()))?;

        tracing::info!(path = %path.display(), "storage initialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database for testing.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StorageLoad(e.to_string()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|e| Error::StorageLoad(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::result::Result<std::sync::MutexGuard<'_, Connection>, String> {
        self.conn
            .lock()
            .map_err(|_| "storage connection poisoned".to_string())
    }
}

impl StoragePort for SqliteStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock().map_err(Error::StorageLoad)?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::StorageLoad(e.to_string()))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock().map_err(Error::StorageSave)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| Error::StorageSave(e.to_string()))?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::result::Result<std::sync::MutexGuard<'_, HashMap<String, String>>, String> {
        self.entries
            .lock()
            .map_err(|_| "storage map poisoned".to_string())
    }
}

impl StoragePort for MemStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().map_err(Error::StorageLoad)?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.lock()
            .map_err(Error::StorageSave)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
