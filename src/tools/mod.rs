pub mod memory_stats;
pub mod recall;
pub mod remember;

use memory_stats::{InspectConceptParams, MemoryStatsParams};
use recall::RecallParams;
use remember::RememberParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use std::sync::Arc;

use crate::memory::{EngramType, Memory, MemoryError, RecallOptions, SqliteStore};

/// The mnemos MCP tool handler. Holds the shared memory engine and exposes
/// remember/recall over MCP via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct MnemosTools {
    tool_router: ToolRouter<Self>,
    memory: Arc<Memory<SqliteStore>>,
}

impl MnemosTools {
    /// Run a synchronous engine call off the async runtime.
    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&Memory<SqliteStore>) -> Result<T, MemoryError> + Send + 'static,
    {
        let memory = Arc::clone(&self.memory);
        tokio::task::spawn_blocking(move || f(&memory))
            .await
            .map_err(|e| format!("{op} task failed: {e}"))?
            .map_err(|e| format!("{op} failed: {e}"))
    }
}

#[tool_router]
impl MnemosTools {
    pub fn new(memory: Arc<Memory<SqliteStore>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            memory,
        }
    }

    /// Store a new engram and index its concepts.
    #[tool(description = "Remember something. Provide the content and a mindmap schema of the concepts it touches; the memory can later be recalled by any of those concepts.")]
    async fn remember(
        &self,
        Parameters(params): Parameters<RememberParams>,
    ) -> Result<String, String> {
        let engram_type = match params.r#type.as_deref() {
            Some(t) => t.parse::<EngramType>()?,
            None => EngramType::default(),
        };

        if params.content.trim().is_empty() {
            return Err("content must not be empty".into());
        }

        tracing::info!(
            content_len = params.content.len(),
            engram_type = %engram_type,
            "remember called"
        );

        let RememberParams {
            content, schema, ..
        } = params;
        let result = self
            .run("remember", move |m| m.remember(&content, &schema, engram_type))
            .await?;

        tracing::info!(
            id = %result.engram.id(),
            concepts = result.concepts.len(),
            "engram remembered"
        );

        Ok(serde_json::json!({
            "id": result.engram.id(),
            "type": result.engram.engram_type(),
            "created_at": result.engram.created_at(),
            "concepts": result.concepts,
            "newly_stored": result.newly_stored,
        })
        .to_string())
    }

    /// Recall engrams by concept query or hydrate them by id.
    #[tool(description = "Recall memories by keyword. Matches remembered concepts by substring (case-insensitive, any script) and returns the attached memories, best matches first. Alternatively pass 'ids' to fetch specific memories.")]
    async fn recall(
        &self,
        Parameters(params): Parameters<RecallParams>,
    ) -> Result<String, String> {
        match (params.query, params.ids) {
            (Some(_), Some(_)) => Err("provide either 'query' or 'ids', not both".into()),
            (None, None) => Err("either 'query' or 'ids' is required".into()),
            (Some(query), None) => {
                let defaults = self.memory.options();
                let options = RecallOptions {
                    max_results: params.max_results.unwrap_or(defaults.max_results),
                    activation_depth: params.activation_depth.unwrap_or(defaults.activation_depth),
                };
                tracing::info!(query = %query, "recall called");

                let response = self
                    .run("recall", move |m| m.recall_with(&query, &options))
                    .await?;
                serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
            }
            (None, Some(ids)) => {
                tracing::info!(count = ids.len(), "recall by ids called");
                let engrams = self.run("recall", move |m| m.fetch(&ids)).await?;
                Ok(serde_json::json!({
                    "total": engrams.len(),
                    "engrams": engrams,
                })
                .to_string())
            }
        }
    }

    /// Show one concept with its parents, children and attached engrams.
    #[tool(description = "Inspect a concept in the memory graph: its parent and child concepts and the IDs of memories attached to it.")]
    async fn inspect_concept(
        &self,
        Parameters(params): Parameters<InspectConceptParams>,
    ) -> Result<String, String> {
        tracing::info!(label = %params.label, "inspect_concept called");
        let label = params.label.clone();
        let view = self
            .run("inspect", move |m| m.inspect(&label))
            .await?
            .ok_or_else(|| format!("concept not found: {}", params.label))?;
        serde_json::to_string(&view).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Get statistics about the memory store and concept graph.
    #[tool(description = "Get memory statistics: engram counts by type, concept and edge counts, storage size.")]
    async fn memory_stats(
        &self,
        Parameters(_params): Parameters<MemoryStatsParams>,
    ) -> Result<String, String> {
        tracing::info!("memory_stats called");
        let stats = self.run("stats", |m| m.stats()).await?;
        serde_json::to_string(&stats).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for MnemosTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "mnemos is a cognitive memory server. Use remember to store a memory with a \
                 mindmap schema of its concepts, recall to retrieve memories by concept keyword, \
                 and inspect_concept to explore the concept graph."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
