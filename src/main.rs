mod cli;
mod config;
mod db;
mod memory;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use memory::EngramType;

#[derive(Parser)]
#[command(name = "mnemos", version, about = "Concept-graph memory MCP server for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// Store an engram and index the concepts in its mindmap schema
    Remember {
        /// Mindmap schema file, or `-` to read it from stdin
        #[arg(long)]
        schema: PathBuf,
        /// Engram type: atomic, link or pattern
        #[arg(long = "type", default_value = "atomic")]
        engram_type: EngramType,
        /// The engram's content
        content: String,
    },
    /// Recall engrams whose concepts match a keyword
    Recall {
        query: String,
        /// Maximum number of engrams to show (0 = unlimited)
        #[arg(long)]
        max: Option<usize>,
        /// Print the engrams as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a concept with its parents, children and engrams
    Inspect { label: String },
    /// Show store and concept-graph statistics
    Stats,
    /// Export all engrams as JSON to stdout
    Export,
    /// Import engrams from an export file
    Import { file: PathBuf },
    /// Check database health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::MnemosConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve_stdio(config).await?,
        Command::Remember {
            schema,
            engram_type,
            content,
        } => cli::remember::remember(&config, &content, &schema, engram_type)?,
        Command::Recall { query, max, json } => cli::recall::recall(&config, &query, max, json)?,
        Command::Inspect { label } => cli::inspect::inspect(&config, &label)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Export => cli::export::export(&config)?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
