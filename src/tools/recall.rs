//! MCP `recall` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `recall` MCP tool.
///
/// Provide either `query` (concept-graph recall) or `ids` (direct hydration), not both.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecallParams {
    /// Keyword or phrase matched against concept labels. Required unless `ids` is provided.
    #[schemars(
        description = "Keyword or phrase matched against remembered concepts (substring, case-insensitive). Required unless 'ids' is provided."
    )]
    pub query: Option<String>,

    /// Specific engram IDs to hydrate. Required unless `query` is provided.
    #[schemars(description = "Specific engram IDs to fetch. Required unless 'query' is provided.")]
    pub ids: Option<Vec<String>>,

    #[schemars(description = "Maximum number of engrams to return. Defaults to the server setting.")]
    pub max_results: Option<usize>,

    #[schemars(
        description = "Also recall memories attached to concepts up to this many levels below each match. Defaults to the server setting."
    )]
    pub activation_depth: Option<usize>,
}
