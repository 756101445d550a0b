//! Local persistent storage: a SQLite-backed key-value table.
//!
//! Plays the role a browser's `localStorage` plays for a web client. The
//! only key the client depends on is the fallback session cookie list, but
//! the store is general.

use std::path::Path;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use sg_core::config::StorageConfig;
use sg_core::error::{SgError, SgResult};

use crate::migrations;
use crate::schema;

/// Type alias for the SQLite connection pool.
pub type StoragePool = Pool<SqliteConnectionManager>;

/// Key-value local storage with pooled SQLite connections.
#[derive(Clone)]
pub struct LocalStorage {
    pool: Arc<StoragePool>,
}

impl LocalStorage {
    /// Open (creating if needed) the storage file at `path`.
    pub fn open(path: &Path, config: &StorageConfig) -> SgResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("opening local storage at {}", path.display());

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionCustomizer {
                wal_mode: config.wal_mode,
            }))
            .build(manager)
            .map_err(|e| SgError::Pool(e.to_string()))?;

        Self::from_pool(pool)
    }

    /// In-memory storage. A single pooled connection keeps the data alive.
    pub fn in_memory() -> SgResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| SgError::Pool(e.to_string()))?;

        Self::from_pool(pool)
    }

    fn from_pool(pool: StoragePool) -> SgResult<Self> {
        let storage = Self {
            pool: Arc::new(pool),
        };
        {
            let conn = storage.conn()?;
            schema::create_tables(&conn)?;
            migrations::run_migrations(&conn)?;
        }
        Ok(storage)
    }

    /// Get a connection from the pool.
    pub fn conn(&self) -> SgResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| SgError::Pool(e.to_string()))
    }

    /// Read a value.
    pub fn get(&self, key: &str) -> SgResult<Option<String>> {
        let conn = self.conn()?;
        match conn.query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SgError::Storage(e.to_string())),
        }
    }

    /// Write a value (upsert).
    pub fn set(&self, key: &str, value: &str) -> SgResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, strftime('%s','now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e| SgError::Storage(e.to_string()))?;
        debug!("local storage: set {key}");
        Ok(())
    }

    /// Remove a value. Returns whether the key existed.
    pub fn remove(&self, key: &str) -> SgResult<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])
            .map_err(|e| SgError::Storage(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Remove every key.
    pub fn clear(&self) -> SgResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM local_storage", [])
            .map_err(|e| SgError::Storage(e.to_string()))?;
        Ok(())
    }

    /// List all stored keys, sorted.
    pub fn keys(&self) -> SgResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT key FROM local_storage ORDER BY key")
            .map_err(|e| SgError::Storage(e.to_string()))?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| SgError::Storage(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(keys)
    }
}

/// r2d2 connection customizer that applies PRAGMA settings.
#[derive(Debug)]
struct ConnectionCustomizer {
    wal_mode: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        if self.wal_mode {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }
        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;
        Ok(())
    }
}
