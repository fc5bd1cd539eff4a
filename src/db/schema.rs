//! SQL DDL for the engram store.
//!
//! Defines the append-only `engrams` table and `schema_meta`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// Schema DDL for the long-term store.
const SCHEMA_SQL: &str = r#"
-- Append-only engram log. rowid order is append order.
CREATE TABLE IF NOT EXISTS engrams (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL CHECK(type IN ('atomic','link','pattern')),
    content TEXT NOT NULL,
    schema TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"engrams".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn type_check_rejects_unknown_types() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO engrams (id, type, content, schema, created_at) \
             VALUES ('x', 'episodic', 'c', 'root((A))', '2024-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }
}
