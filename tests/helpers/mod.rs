#![allow(dead_code)]

use mnemos::memory::{EngramType, Memory, SqliteStore};
use std::path::Path;

/// A memory engine over a fresh in-memory store.
pub fn test_memory() -> Memory<SqliteStore> {
    Memory::open(SqliteStore::open_in_memory().unwrap()).unwrap()
}

/// A memory engine over an on-disk store at `path`.
pub fn file_memory(path: &Path) -> Memory<SqliteStore> {
    Memory::open(SqliteStore::open(path).unwrap()).unwrap()
}

/// Remember an atomic engram and return its id.
pub fn remember(memory: &Memory<SqliteStore>, content: &str, schema: &str) -> String {
    memory
        .remember(content, schema, EngramType::Atomic)
        .unwrap()
        .engram
        .id()
        .to_string()
}

/// Ids recalled for `query`, in recall order.
pub fn recall_ids(memory: &Memory<SqliteStore>, query: &str) -> Vec<String> {
    memory
        .recall(query)
        .unwrap()
        .iter()
        .map(|e| e.id().to_string())
        .collect()
}
