use anyhow::Result;

use crate::config::MnemosConfig;
use crate::memory::EngramType;

/// Display memory statistics in the terminal.
pub fn stats(config: &MnemosConfig) -> Result<()> {
    let memory = crate::server::open_memory(config)?;
    let response = memory.stats()?;

    println!("Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total engrams:       {}", response.total_engrams);
    println!();

    println!("By Type:");
    for t in EngramType::ALL {
        let count = response.by_type.get(t.as_str()).copied().unwrap_or(0);
        println!("  {:<12} {}", t, count);
    }
    println!();

    println!("Concepts:              {}", response.concepts);
    println!("Edges:                 {}", response.edges);
    println!("Database size:         {} bytes", response.db_size_bytes);

    Ok(())
}
