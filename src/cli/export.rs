use anyhow::Result;
use serde::Serialize;

use mnema::config::MnemaConfig;
use mnema::memory::types::Memory;

/// Export format — the full memory collection, connections included.
#[derive(Debug, Serialize)]
struct ExportData<'a> {
    memories: &'a [Memory],
}

/// Export all memories as JSON to stdout.
pub fn export(config: &MnemaConfig) -> Result<()> {
    let manager = super::open_manager(config)?;

    let data = ExportData {
        memories: manager.list(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} memories.", data.memories.len());
    Ok(())
}
