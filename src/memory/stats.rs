use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::error::MemoryError;
use super::network::SemanticNetwork;
use super::store::LongTermStore;

/// Response from memory_stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_engrams: u64,
    pub by_type: BTreeMap<String, u64>,
    pub concepts: usize,
    pub edges: usize,
    pub db_size_bytes: u64,
}

/// Gather store and graph statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory stores.
pub fn memory_stats<S: LongTermStore + ?Sized>(
    network: &SemanticNetwork,
    store: &S,
    db_path: Option<&Path>,
) -> Result<StatsResponse, MemoryError> {
    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        total_engrams: store.count()?,
        by_type: store.count_by_type()?,
        concepts: network.len(),
        edges: network.edge_count(),
        db_size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::mindmap::parse;
    use crate::memory::store::SqliteStore;
    use crate::memory::types::{Engram, EngramType};

    #[test]
    fn stats_count_store_and_graph() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut network = SemanticNetwork::new();
        for (kind, schema) in [
            (EngramType::Atomic, "root((X))\n  Y"),
            (EngramType::Link, "root((X))\n  W"),
        ] {
            let e = Engram::new("c", schema, kind);
            store.append(&e).unwrap();
            network.index(&parse(schema).unwrap(), e.id());
        }

        let stats = memory_stats(&network, &store, None).unwrap();
        assert_eq!(stats.total_engrams, 2);
        assert_eq!(stats.by_type["atomic"], 1);
        assert_eq!(stats.by_type["link"], 1);
        assert_eq!(stats.concepts, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.db_size_bytes, 0);
    }
}
