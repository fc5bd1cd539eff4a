//! Long-term store: the durable, append-only engram record.
//!
//! [`LongTermStore`] is the contract the engine depends on; [`SqliteStore`] is
//! the SQLite-backed implementation, either file-backed or in-memory for tests.
//! Appends are idempotent by id and never overwrite or reorder prior entries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::error::StorageError;
use super::types::{Engram, EngramType};
use crate::db::{self, HealthReport};

/// SQLite caps bound parameters per statement; fetch in chunks below that.
const FETCH_CHUNK: usize = 500;

/// Durable append/fetch contract for engrams.
///
/// All methods are synchronous. Callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait LongTermStore: Send + Sync {
    /// Durably record an engram. Returns `false` if an engram with the same id
    /// was already stored (the existing record is left untouched).
    fn append(&self, engram: &Engram) -> Result<bool, StorageError>;

    /// Engrams for `ids` in the order given. Unknown ids are skipped.
    fn fetch(&self, ids: &[String]) -> Result<Vec<Engram>, StorageError>;

    /// Every engram in append order.
    fn load_all(&self) -> Result<Vec<Engram>, StorageError>;

    fn count(&self) -> Result<u64, StorageError>;

    /// Backing file, if the medium has one.
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Engram counts keyed by type name.
    fn count_by_type(&self) -> Result<BTreeMap<String, u64>, StorageError> {
        let mut counts: BTreeMap<String, u64> = EngramType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();
        for engram in self.load_all()? {
            *counts.entry(engram.engram_type().to_string()).or_default() += 1;
        }
        Ok(counts)
    }
}

/// SQLite-backed [`LongTermStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = db::open_database(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a store whose contents vanish when it is dropped.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(db::open_memory_database()?),
            path: None,
        })
    }

    pub fn health(&self) -> Result<HealthReport, StorageError> {
        let conn = self.lock()?;
        db::check_database_health(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl LongTermStore for SqliteStore {
    fn append(&self, engram: &Engram) -> Result<bool, StorageError> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "INSERT OR IGNORE INTO engrams (id, type, content, schema, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                engram.id(),
                engram.engram_type().as_str(),
                engram.content(),
                engram.schema(),
                engram.created_at().to_rfc3339(),
            ],
        )?;

        if rows == 0 {
            tracing::debug!(id = %engram.id(), "engram already stored, append skipped");
        }
        Ok(rows > 0)
    }

    fn fetch(&self, ids: &[String]) -> Result<Vec<Engram>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut found: HashMap<String, Engram> = HashMap::new();
        for chunk in ids.chunks(FETCH_CHUNK) {
            let placeholders: Vec<String> = (1..=chunk.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT id, type, content, schema, created_at FROM engrams WHERE id IN ({})",
                placeholders.join(", ")
            );
            for engram in query_engrams(&conn, &sql, rusqlite::params_from_iter(chunk))? {
                found.insert(engram.id().to_string(), engram);
            }
        }

        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }

    fn load_all(&self) -> Result<Vec<Engram>, StorageError> {
        let conn = self.lock()?;
        query_engrams(
            &conn,
            "SELECT id, type, content, schema, created_at FROM engrams ORDER BY rowid",
            [],
        )
    }

    fn count(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM engrams", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn location(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn count_by_type(&self) -> Result<BTreeMap<String, u64>, StorageError> {
        let conn = self.lock()?;
        let mut counts: BTreeMap<String, u64> = EngramType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();

        let mut stmt = conn.prepare("SELECT type, COUNT(*) FROM engrams GROUP BY type")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        for (engram_type, count) in rows {
            counts.insert(engram_type, count as u64);
        }
        Ok(counts)
    }
}

/// Raw row as stored, decoded into an [`Engram`] by [`decode_row`].
struct EngramRow {
    id: String,
    engram_type: String,
    content: String,
    schema: String,
    created_at: String,
}

fn query_engrams<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Engram>, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(EngramRow {
                id: row.get(0)?,
                engram_type: row.get(1)?,
                content: row.get(2)?,
                schema: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(decode_row).collect()
}

fn decode_row(row: EngramRow) -> Result<Engram, StorageError> {
    let engram_type: EngramType = row.engram_type.parse().map_err(|reason| StorageError::Corrupt {
        id: row.id.clone(),
        reason,
    })?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| StorageError::Corrupt {
            id: row.id.clone(),
            reason: format!("bad created_at {:?}: {e}", row.created_at),
        })?
        .with_timezone(&Utc);

    Ok(Engram::from_parts(
        row.id,
        row.content,
        row.schema,
        engram_type,
        created_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engram(id: &str, content: &str) -> Engram {
        Engram::with_id(id, content, "root((X))", EngramType::Atomic)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn append_then_fetch_round_trips_every_field() {
        let store = SqliteStore::open_in_memory().unwrap();
        let e = Engram::with_id("e1", "alpha", "root((X))\n  Y", EngramType::Pattern);
        assert!(store.append(&e).unwrap());

        let fetched = store.fetch(&ids(&["e1"])).unwrap();
        assert_eq!(fetched, vec![e]);
    }

    #[test]
    fn fetch_follows_requested_order_and_skips_missing() {
        let store = SqliteStore::open_in_memory().unwrap();
        for (id, content) in [("a", "first"), ("b", "second"), ("c", "third")] {
            store.append(&engram(id, content)).unwrap();
        }

        let fetched = store.fetch(&ids(&["c", "missing", "a"])).unwrap();
        let got: Vec<&str> = fetched.iter().map(|e| e.id()).collect();
        assert_eq!(got, vec!["c", "a"]);

        assert!(store.fetch(&[]).unwrap().is_empty());
    }

    #[test]
    fn append_is_idempotent_by_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.append(&engram("a", "original")).unwrap());
        assert!(!store.append(&engram("a", "retry with new content")).unwrap());

        assert_eq!(store.count().unwrap(), 1);
        let fetched = store.fetch(&ids(&["a"])).unwrap();
        assert_eq!(fetched[0].content(), "original");
    }

    #[test]
    fn load_all_returns_append_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        for id in ["z", "m", "a"] {
            store.append(&engram(id, id)).unwrap();
        }
        let all: Vec<String> = store
            .load_all()
            .unwrap()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(all, ids(&["z", "m", "a"]));
    }

    #[test]
    fn fetch_handles_more_ids_than_one_chunk() {
        let store = SqliteStore::open_in_memory().unwrap();
        let wanted: Vec<String> = (0..(FETCH_CHUNK + 20)).map(|i| format!("e{i}")).collect();
        for id in &wanted {
            store.append(&engram(id, "bulk")).unwrap();
        }
        let fetched = store.fetch(&wanted).unwrap();
        assert_eq!(fetched.len(), wanted.len());
        assert_eq!(fetched.last().unwrap().id(), wanted.last().unwrap());
    }

    #[test]
    fn count_by_type_includes_zero_counts() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(&engram("a", "x")).unwrap();
        store
            .append(&Engram::with_id("b", "y", "root((Y))", EngramType::Link))
            .unwrap();

        let counts = store.count_by_type().unwrap();
        assert_eq!(counts["atomic"], 1);
        assert_eq!(counts["link"], 1);
        assert_eq!(counts["pattern"], 0);
    }

    #[test]
    fn file_store_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("engrams.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.append(&engram("keep", "durable")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.location(), Some(path.as_path()));
        let fetched = store.fetch(&ids(&["keep"])).unwrap();
        assert_eq!(fetched[0].content(), "durable");
    }

    #[test]
    fn corrupt_rows_surface_as_storage_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO engrams (id, type, content, schema, created_at) \
                 VALUES ('bad', 'atomic', 'c', 'root((A))', 'yesterday')",
                [],
            )
            .unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref id, .. } if id == "bad"));
    }

    #[test]
    fn health_reports_engram_count() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(&engram("a", "alpha")).unwrap();

        let report = store.health().unwrap();
        assert!(report.integrity_ok);
        assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
        assert_eq!(report.engram_count, 1);
    }
}
