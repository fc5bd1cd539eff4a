//! CLI `remember` command: store one engram from the terminal.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::config::MnemosConfig;
use crate::memory::EngramType;

/// Read a mindmap schema from a file, or from stdin when `source` is `-`.
pub fn read_schema(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read schema from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source)
        .with_context(|| format!("failed to read schema file: {}", source.display()))
}

/// Consolidate one engram and print its id and touched concepts.
pub fn remember(
    config: &MnemosConfig,
    content: &str,
    schema_source: &Path,
    engram_type: EngramType,
) -> Result<()> {
    let schema = read_schema(schema_source)?;
    let memory = crate::server::open_memory(config)?;

    let result = memory.remember(content, &schema, engram_type)?;

    println!("Remembered {}", result.engram.id());
    println!("  Type:      {}", result.engram.engram_type());
    println!("  Concepts:  {}", result.concepts.join(", "));

    Ok(())
}
