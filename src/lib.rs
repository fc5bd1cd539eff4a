//! Concept-graph memory for AI agents, served over MCP.
//!
//! Mnemos stores *engrams*: immutable records pairing free-text content with a
//! Mermaid-style mindmap schema that names the concepts the content touches.
//! Every schema is merged into one deduplicated semantic network, and recall
//! works by matching a keyword against concept labels and returning the
//! engrams attached to the matching concepts.
//!
//! | Engram type | Purpose |
//! |-------------|---------|
//! | **Atomic** | A single fact or event |
//! | **Link** | A relationship between existing ideas |
//! | **Pattern** | A recurring structure or procedure |
//!
//! # Architecture
//!
//! - **Storage**: SQLite append-only engram table, the durable source of truth
//! - **Index**: in-memory semantic network rebuilt from storage on startup
//! - **Recall**: exact label match first, then substring matches by key length
//! - **Transport**: MCP over stdio
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`memory`]: mindmap parsing, the semantic network, consolidation and recall

pub mod config;
pub mod db;
pub mod memory;
