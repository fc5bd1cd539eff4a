use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::MnemosConfig;
use crate::memory::{Engram, LongTermStore, SqliteStore};

/// Export format, shared with `import`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub engrams: Vec<Engram>,
}

/// Export every stored engram as JSON to stdout, in append order.
pub fn export(config: &MnemosConfig) -> Result<()> {
    let store = SqliteStore::open(config.resolved_db_path())?;

    let data = ExportData {
        engrams: store.load_all()?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} engrams.", data.engrams.len());

    Ok(())
}
