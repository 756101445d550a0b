//! Versioned local storage migrations.
//!
//! Migrations run sequentially from the stored version to the latest.

use rusqlite::Connection;
use tracing::{info, warn};
use sg_core::constants::{COOKIE_FALLBACK_KEY, DB_SCHEMA_VERSION, EMPTY_COOKIE_FALLBACK};
use sg_core::error::{SgError, SgResult};

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> SgResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version >= DB_SCHEMA_VERSION {
        return Ok(());
    }

    info!("migrating local storage from version {current_version} to {DB_SCHEMA_VERSION}");

    for version in (current_version + 1)..=DB_SCHEMA_VERSION {
        run_migration(conn, version)?;
    }

    set_schema_version(conn, DB_SCHEMA_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> SgResult<i32> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .map_err(|e| SgError::Storage(e.to_string()))?;

    if count == 0 {
        conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])
            .map_err(|e| SgError::Storage(e.to_string()))?;
        return Ok(0);
    }

    conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .map_err(|e| SgError::Storage(e.to_string()))
}

fn set_schema_version(conn: &Connection, version: i32) -> SgResult<()> {
    conn.execute("UPDATE schema_version SET version = ?1", [version])
        .map_err(|e| SgError::Storage(e.to_string()))?;
    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> SgResult<()> {
    match version {
        1 => migration_v1(conn),
        _ => {
            warn!("unknown migration version {version}, skipping");
            Ok(())
        }
    }
}

/// v1: blank session markers are rewritten as the empty-list marker so the
/// sign-in precheck only has two "no session" spellings to recognize.
fn migration_v1(conn: &Connection) -> SgResult<()> {
    conn.execute(
        "UPDATE local_storage SET value = ?1 WHERE key = ?2 AND trim(value) = ''",
        [EMPTY_COOKIE_FALLBACK, COOKIE_FALLBACK_KEY],
    )
    .map_err(|e| SgError::Storage(e.to_string()))?;
    Ok(())
}
