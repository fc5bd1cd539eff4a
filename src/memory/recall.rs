//! Read path: concept matching, id collection, and store hydration.
//!
//! Query → [`SemanticNetwork::matches`] → union of attached engram ids (first
//! occurrence wins) → optional spreading activation → [`LongTermStore::fetch`].
//! The network read lock is held only while ids are collected.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::RwLock;

use super::error::MemoryError;
use super::network::{normalize, ConceptMatch, SemanticNetwork};
use super::store::LongTermStore;
use super::types::Engram;

/// Recall knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecallOptions {
    /// Cap on returned engrams. `0` means no cap.
    pub max_results: usize,
    /// Child hops to spread from each matched concept. `0` disables spreading.
    pub activation_depth: usize,
}

/// Ordered, de-duplicated engram ids for a query plus the concepts that matched.
#[derive(Debug, Clone, Default)]
pub struct RecallPlan {
    pub matches: Vec<ConceptMatch>,
    pub ids: Vec<String>,
}

/// Response from [`recall_detailed`].
#[derive(Debug, Clone, Serialize)]
pub struct RecallResponse {
    pub concepts: Vec<ConceptMatch>,
    pub engrams: Vec<Engram>,
    pub total: usize,
}

/// Work out which engrams a query reaches, without touching the store.
pub fn plan(network: &SemanticNetwork, query: &str, options: &RecallOptions) -> RecallPlan {
    if normalize(query).is_empty() {
        return RecallPlan::default();
    }

    let matches = network.matches(query);
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut push_ids = |engram_ids: &[String]| {
        for id in engram_ids {
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
    };

    for m in &matches {
        if let Some(node) = network.node(m.id) {
            push_ids(node.engram_ids());
        }
    }

    if options.activation_depth > 0 {
        let start: Vec<_> = matches.iter().map(|m| m.id).collect();
        for id in network.spread(&start, options.activation_depth) {
            if let Some(node) = network.node(id) {
                push_ids(node.engram_ids());
            }
        }
    }

    RecallPlan { matches, ids }
}

/// Engrams reachable from `query`, best matches first, each at most once.
pub fn recall<S: LongTermStore + ?Sized>(
    network: &RwLock<SemanticNetwork>,
    store: &S,
    query: &str,
    options: &RecallOptions,
) -> Result<Vec<Engram>, MemoryError> {
    Ok(recall_detailed(network, store, query, options)?.engrams)
}

/// Like [`recall`], also reporting which concepts matched.
pub fn recall_detailed<S: LongTermStore + ?Sized>(
    network: &RwLock<SemanticNetwork>,
    store: &S,
    query: &str,
    options: &RecallOptions,
) -> Result<RecallResponse, MemoryError> {
    let plan = {
        let net = network.read().map_err(|_| MemoryError::LockPoisoned)?;
        plan(&net, query, options)
    };

    if plan.ids.is_empty() {
        tracing::debug!(query, "recall matched nothing");
        return Ok(RecallResponse {
            concepts: plan.matches,
            engrams: Vec::new(),
            total: 0,
        });
    }

    let mut engrams = store.fetch(&plan.ids)?;
    let total = engrams.len();
    if options.max_results > 0 {
        engrams.truncate(options.max_results);
    }

    tracing::debug!(
        query,
        concepts = plan.matches.len(),
        total,
        returned = engrams.len(),
        "recall complete"
    );

    Ok(RecallResponse {
        concepts: plan.matches,
        engrams,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::consolidate::consolidate;
    use crate::memory::store::SqliteStore;
    use crate::memory::types::EngramType;

    struct Fixture {
        network: RwLock<SemanticNetwork>,
        store: SqliteStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                network: RwLock::new(SemanticNetwork::new()),
                store: SqliteStore::open_in_memory().unwrap(),
            }
        }

        fn remember(&self, id: &str, content: &str, schema: &str) {
            let engram = Engram::with_id(id, content, schema, EngramType::Atomic);
            consolidate(&self.network, &self.store, engram).unwrap();
        }

        fn recall_ids(&self, query: &str, options: RecallOptions) -> Vec<String> {
            recall(&self.network, &self.store, query, &options)
                .unwrap()
                .into_iter()
                .map(|e| e.id().to_string())
                .collect()
        }
    }

    #[test]
    fn plan_deduplicates_ids_across_concepts() {
        let f = Fixture::new();
        f.remember("a", "alpha", "root((deploy))\n  deploy pipeline");
        f.remember("b", "beta", "root((deploy pipeline))");

        let net = f.network.read().unwrap();
        let plan = plan(&net, "deploy", &RecallOptions::default());
        assert_eq!(plan.matches.len(), 2);
        assert_eq!(plan.ids, vec!["a", "b"]);
    }

    #[test]
    fn exact_match_engrams_come_first() {
        let f = Fixture::new();
        f.remember("partial", "p", "root((rust ownership))");
        f.remember("exact", "e", "root((rust))");

        assert_eq!(f.recall_ids("Rust", RecallOptions::default()), vec!["exact", "partial"]);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let f = Fixture::new();
        f.remember("a", "alpha", "root((X))");
        assert!(f.recall_ids("   ", RecallOptions::default()).is_empty());
        assert!(f.recall_ids("", RecallOptions::default()).is_empty());
    }

    #[test]
    fn max_results_caps_output() {
        let f = Fixture::new();
        for id in ["a", "b", "c"] {
            f.remember(id, id, "root((shared))");
        }
        let options = RecallOptions {
            max_results: 2,
            ..Default::default()
        };
        assert_eq!(f.recall_ids("shared", options), vec!["a", "b"]);

        let response = recall_detailed(&f.network, &f.store, "shared", &options).unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.engrams.len(), 2);
    }

    #[test]
    fn activation_spreads_to_descendants() {
        let f = Fixture::new();
        f.remember("top", "t", "root((project))\n  backend");
        f.remember("deep", "d", "root((backend))\n  database");

        // "database" only reaches the engram that mentions it.
        assert_eq!(f.recall_ids("database", RecallOptions::default()), vec!["deep"]);

        // From "project", one hop reaches "backend", which "deep" also touches.
        assert_eq!(f.recall_ids("project", RecallOptions::default()), vec!["top"]);
        let spread = RecallOptions {
            activation_depth: 1,
            ..Default::default()
        };
        assert_eq!(f.recall_ids("project", spread), vec!["top", "deep"]);
    }

    #[test]
    fn stale_ids_are_skipped() {
        let f = Fixture::new();
        f.remember("real", "r", "root((topic))");
        f.network.write().unwrap().attach("topic", "ghost");

        assert_eq!(f.recall_ids("topic", RecallOptions::default()), vec!["real"]);
    }
}
