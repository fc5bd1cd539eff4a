//! Write path: parse, durable append, then graph indexing.
//!
//! [`consolidate`] is the single entry point. A schema that does not parse
//! fails before anything is written. The append happens before the graph is
//! touched, so a failed append leaves no recallable trace; an engram that is
//! stored but not yet indexed is picked up by the rebuild on the next open.

use serde::Serialize;
use std::sync::RwLock;

use super::error::MemoryError;
use super::mindmap;
use super::network::SemanticNetwork;
use super::store::LongTermStore;
use super::types::Engram;

/// Result returned from a consolidation.
#[derive(Debug, Clone, Serialize)]
pub struct Consolidated {
    /// The consolidated engram, or the previously stored one when the id
    /// already existed.
    pub engram: Engram,
    /// Distinct concept labels the engram was attached to, in schema order.
    pub concepts: Vec<String>,
    /// `false` if the store already held this id (a retried append).
    pub newly_stored: bool,
}

/// Store an engram durably and index its schema into the network.
pub fn consolidate<S: LongTermStore + ?Sized>(
    network: &RwLock<SemanticNetwork>,
    store: &S,
    engram: Engram,
) -> Result<Consolidated, MemoryError> {
    // 1. Parse. Nothing has been mutated if this fails.
    let tree = mindmap::parse(engram.schema())?;

    // 2. Durable append. Idempotent by id.
    let newly_stored = store.append(&engram)?;

    // An id that was already stored keeps its stored record. Index that
    // record's schema so the graph never holds concepts the store lacks.
    let (engram, tree) = if newly_stored {
        (engram, tree)
    } else {
        match store.fetch(&[engram.id().to_string()])?.pop() {
            Some(stored) if stored.schema() == engram.schema() => (stored, tree),
            Some(stored) => {
                tracing::warn!(id = %stored.id(), "id already stored with a different schema, keeping stored engram");
                let tree = mindmap::parse(stored.schema())?;
                (stored, tree)
            }
            None => (engram, tree),
        }
    };

    // 3. Merge and attach under the write lock. Re-indexing a retried engram
    //    is a no-op on an already complete graph.
    let concepts = {
        let mut net = network.write().map_err(|_| MemoryError::LockPoisoned)?;
        net.index(&tree, engram.id())
    };

    tracing::debug!(
        id = %engram.id(),
        concepts = concepts.len(),
        newly_stored,
        "engram consolidated"
    );

    Ok(Consolidated {
        engram,
        concepts,
        newly_stored,
    })
}
