pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::memory::error::StorageError;

/// Open (or create) the engram database at the given path with the schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut conn = Connection::open(path)?;

    // WAL keeps readers from blocking the appender.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;

    schema::init_schema(&conn)?;
    migrations::run_migrations(&mut conn)?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database. Same schema, nothing survives the connection.
pub fn open_memory_database() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    schema::init_schema(&conn)?;
    migrations::run_migrations(&mut conn)?;
    Ok(conn)
}

/// Result of a database health check.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub integrity_ok: bool,
    pub schema_version: u32,
    pub engram_count: u64,
}

/// Run `PRAGMA integrity_check` and gather basic counts.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport, StorageError> {
    let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let schema_version = migrations::get_schema_version(conn)?;
    let engram_count: i64 = conn.query_row("SELECT COUNT(*) FROM engrams", [], |row| row.get(0))?;

    Ok(HealthReport {
        integrity_ok: integrity == "ok",
        schema_version,
        engram_count: engram_count as u64,
    })
}
