//! SQLite key/value blob store for phonebook persistence
//!
//! The application stores whole documents (the contact list, the call log)
//! as JSON blobs under well-known keys. The prefix index is never persisted;
//! it is rebuilt from the contact list on open.
//! Uses r2d2 connection pooling to allow concurrent reads without mutex blocking.

use chrono::Utc;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Thread-safe database wrapper using connection pooling
///
/// WAL mode enables readers to proceed without blocking each other.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
            ",
            )?;
            Ok(())
        });

        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder().max_size(1).build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updatedAt TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    /// Read the blob stored under `key`
    pub fn get_blob(&self, key: &str) -> DatabaseResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite the blob stored under `key`
    pub fn put_blob(&self, key: &str, value: &str) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.f").to_string();
        conn.execute(
            "INSERT INTO blobs (key, value, updatedAt) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Write several blobs in one transaction: either all land or none do
    pub fn put_blobs(&self, entries: &[(&str, &str)]) -> DatabaseResult<()> {
        let mut conn = self.get_conn()?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.f").to_string();
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO blobs (key, value, updatedAt) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Remove the blob under `key`. Returns whether it existed.
    pub fn delete_blob(&self, key: &str) -> DatabaseResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    pub fn keys(&self) -> DatabaseResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key FROM blobs ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    pub fn clear_all(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM blobs", [])?;
        Ok(())
    }

    /// Get the database size in bytes
    pub fn database_size(&self) -> DatabaseResult<i64> {
        let conn = self.get_conn()?;
        let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
        Ok(page_count * page_size)
    }

    /// Drop the blob table so every later read and write fails
    #[cfg(test)]
    pub(crate) fn drop_schema(&self) -> DatabaseResult<()> {
        self.get_conn()?.execute_batch("DROP TABLE blobs;")?;
        Ok(())
    }
}
