//! The memory engine: one semantic network plus one long-term store.
//!
//! [`Memory`] is what the MCP tools and CLI hold. Opening it rebuilds the
//! network from every stored engram, so the graph never references an id the
//! store does not have. Writers take the network's write lock only for the
//! merge; readers share the read lock while collecting ids.

use std::sync::RwLock;

use super::consolidate::{self, Consolidated};
use super::error::MemoryError;
use super::mindmap;
use super::network::{ConceptView, SemanticNetwork};
use super::recall::{self, RecallOptions, RecallResponse};
use super::stats::{self, StatsResponse};
use super::store::LongTermStore;
use super::types::{Engram, EngramType};

pub struct Memory<S: LongTermStore> {
    network: RwLock<SemanticNetwork>,
    store: S,
    options: RecallOptions,
}

impl<S: LongTermStore> Memory<S> {
    /// Wrap a store and rebuild the concept graph from its contents.
    ///
    /// Stored engrams whose schema no longer parses are skipped with a warning.
    pub fn open(store: S) -> Result<Self, MemoryError> {
        let mut network = SemanticNetwork::new();
        let engrams = store.load_all()?;

        let mut skipped = 0usize;
        for engram in &engrams {
            match mindmap::parse(engram.schema()) {
                Ok(tree) => {
                    network.index(&tree, engram.id());
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(id = %engram.id(), error = %e, "stored engram has unparseable schema, not indexed");
                }
            }
        }

        tracing::info!(
            engrams = engrams.len(),
            concepts = network.len(),
            skipped,
            "semantic network rebuilt"
        );

        Ok(Self {
            network: RwLock::new(network),
            store,
            options: RecallOptions::default(),
        })
    }

    /// Default options for [`Memory::recall`].
    pub fn with_options(mut self, options: RecallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RecallOptions {
        self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store and index an engram. Returns it unchanged.
    pub fn consolidate(&self, engram: Engram) -> Result<Engram, MemoryError> {
        Ok(self.consolidate_detailed(engram)?.engram)
    }

    /// Like [`Memory::consolidate`], also reporting touched concepts and
    /// whether the append was new.
    pub fn consolidate_detailed(&self, engram: Engram) -> Result<Consolidated, MemoryError> {
        consolidate::consolidate(&self.network, &self.store, engram)
    }

    /// Build an engram from its parts and consolidate it.
    pub fn remember(
        &self,
        content: &str,
        schema: &str,
        engram_type: EngramType,
    ) -> Result<Consolidated, MemoryError> {
        if content.trim().is_empty() {
            return Err(MemoryError::Invalid("content must not be empty".into()));
        }
        if schema.trim().is_empty() {
            return Err(MemoryError::Invalid("schema must not be empty".into()));
        }
        self.consolidate_detailed(Engram::new(content, schema, engram_type))
    }

    /// Engrams reachable from `query` under the default options.
    pub fn recall(&self, query: &str) -> Result<Vec<Engram>, MemoryError> {
        recall::recall(&self.network, &self.store, query, &self.options)
    }

    pub fn recall_with(
        &self,
        query: &str,
        options: &RecallOptions,
    ) -> Result<RecallResponse, MemoryError> {
        recall::recall_detailed(&self.network, &self.store, query, options)
    }

    /// Hydrate engrams by id, in the order given.
    pub fn fetch(&self, ids: &[String]) -> Result<Vec<Engram>, MemoryError> {
        Ok(self.store.fetch(ids)?)
    }

    /// The concept for `label` and its neighbors, if it exists.
    pub fn inspect(&self, label: &str) -> Result<Option<ConceptView>, MemoryError> {
        let net = self.network.read().map_err(|_| MemoryError::LockPoisoned)?;
        Ok(net.view(label))
    }

    pub fn stats(&self) -> Result<StatsResponse, MemoryError> {
        let net = self.network.read().map_err(|_| MemoryError::LockPoisoned)?;
        stats::memory_stats(&net, &self.store, self.store.location())
    }
}
