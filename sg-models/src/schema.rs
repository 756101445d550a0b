//! Local storage schema.

use rusqlite::Connection;
use sg_core::error::{SgError, SgResult};
use tracing::debug;

/// Create the storage tables if they do not exist.
pub fn create_tables(conn: &Connection) -> SgResult<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| SgError::Storage(format!("failed to create schema: {e}")))?;
    debug!("local storage schema verified");
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS local_storage (
    key         TEXT PRIMARY KEY NOT NULL,
    value       TEXT NOT NULL,
    updated_at  INTEGER NOT NULL DEFAULT 0
);
"#;
