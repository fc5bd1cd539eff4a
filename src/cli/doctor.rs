//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::MnemosConfig;
use crate::memory::SqliteStore;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &MnemosConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `mnemos serve` or `mnemos remember` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let store = SqliteStore::open(&db_path).context("failed to open database (may be corrupt)")?;
    let report = store.health().context("failed to run health check")?;

    println!("Mnemos Health Report");
    println!("====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("Engrams:           {}", report.engram_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED");
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.mnemos/engrams.db");
        println!("  2. Or export from a good copy and reimport into a fresh database:");
        println!("     mnemos export > backup.json");
        println!("     MNEMOS_DB=/tmp/fresh.db mnemos import backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
