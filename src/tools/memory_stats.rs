//! MCP `memory_stats` and `inspect_concept` tool parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `memory_stats` MCP tool. Takes no arguments.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct MemoryStatsParams {}

/// Parameters for the `inspect_concept` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InspectConceptParams {
    #[schemars(description = "Concept label to inspect (case-insensitive)")]
    pub label: String,
}
