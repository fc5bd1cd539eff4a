use anyhow::{Context, Result};
use std::path::Path;

use super::export::ExportData;
use crate::config::MnemosConfig;

/// Import engrams from a JSON file produced by `export`.
///
/// Ids and timestamps are preserved. Engrams whose id is already stored are
/// skipped; ones whose schema no longer parses are reported and skipped.
pub fn import(config: &MnemosConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: ExportData = serde_json::from_str(&json).context("failed to parse import JSON")?;

    let memory = crate::server::open_memory(config)?;

    let mut imported = 0u64;
    let mut skipped = 0u64;
    let mut rejected = 0u64;

    println!("Importing {} engrams...", data.engrams.len());

    for engram in data.engrams {
        let id = engram.id().to_string();
        match memory.consolidate_detailed(engram) {
            Ok(result) if result.newly_stored => imported += 1,
            Ok(_) => skipped += 1,
            Err(crate::memory::MemoryError::Parse(e)) => {
                eprintln!("Warning: engram {id} has an invalid schema: {e}");
                rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("Import complete:");
    println!("  Engrams imported:  {imported}");
    println!("  Engrams skipped:   {skipped} (already exist)");
    if rejected > 0 {
        println!("  Engrams rejected:  {rejected}");
    }

    Ok(())
}
