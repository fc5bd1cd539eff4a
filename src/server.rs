//! MCP server initialization for the stdio transport.
//!
//! [`serve_stdio`] opens the store, rebuilds the concept graph, and serves the
//! remember/recall tools until the client disconnects.

use crate::config::MnemosConfig;
use crate::memory::{Memory, SqliteStore};
use crate::tools::MnemosTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::Arc;

/// Open the configured store and wrap it in a memory engine.
pub fn open_memory(config: &MnemosConfig) -> Result<Memory<SqliteStore>> {
    let db_path = config.resolved_db_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open engram store at {}", db_path.display()))?;
    tracing::info!(db = %db_path.display(), "engram store ready");

    let memory = Memory::open(store)
        .context("failed to rebuild semantic network")?
        .with_options(config.recall.options());
    Ok(memory)
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MnemosConfig) -> Result<()> {
    tracing::info!("starting mnemos MCP server on stdio");

    let memory = tokio::task::spawn_blocking(move || open_memory(&config)).await??;
    let tools = MnemosTools::new(Arc::new(memory));
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
