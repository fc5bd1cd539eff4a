//! CLI `recall` command: query the concept graph and print matching engrams.

use anyhow::Result;

use crate::config::MnemosConfig;

/// Recall engrams for `query` and print them, best-matching concept first.
pub fn recall(config: &MnemosConfig, query: &str, max: Option<usize>, json: bool) -> Result<()> {
    let memory = crate::server::open_memory(config)?;

    let mut options = memory.options();
    if let Some(max) = max {
        options.max_results = max;
    }
    let response = memory.recall_with(query, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.engrams)?);
        return Ok(());
    }

    if response.engrams.is_empty() {
        println!("No memories found for \"{query}\".");
        return Ok(());
    }

    let labels: Vec<&str> = response.concepts.iter().map(|c| c.label.as_str()).collect();
    println!("Matched concepts: {}", labels.join(", "));
    println!(
        "Showing {} of {} engram(s)",
        response.engrams.len(),
        response.total
    );
    println!("{}", "=".repeat(50));

    for engram in &response.engrams {
        println!();
        println!(
            "[{}] {} ({})",
            engram.engram_type(),
            engram.id(),
            engram.created_at().format("%Y-%m-%d %H:%M:%S")
        );
        println!("  {}", engram.content());
    }

    Ok(())
}
