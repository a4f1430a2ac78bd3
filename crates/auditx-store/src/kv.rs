//! SQLite-backed key-value store.
//!
//! One `kv(key, value)` table holds the engine's persisted JSON blobs.
//! Writes are upserts; the engine treats failures as best-effort, so
//! errors are reported but never retried here.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use auditx_core::errors::Result;
use auditx_core::kv::KvStore;

use crate::db;
use crate::errors::from_rusqlite;

/// Durable key-value store over a SQLite table
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Wrap an existing connection, creating the kv table if needed
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the table cannot be created.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(from_rusqlite)?;
        Ok(Self { conn })
    }

    /// Open (or create) a store at the given path
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the database cannot be opened or prepared.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn)?;
        Self::new(conn)
    }

    /// Open an in-memory store (for testing)
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the database cannot be opened or prepared.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(db::open_in_memory()?)
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(from_rusqlite)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        debug!(key, bytes = value.len(), "kv write");
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }
}
