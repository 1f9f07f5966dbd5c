use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mnema::config::MnemaConfig;
use mnema::memory::types::Memory;

/// Import format — matches export output.
#[derive(Debug, Deserialize)]
struct ImportData {
    memories: Vec<Memory>,
}

/// Import memories from a JSON file.
///
/// Re-embeds each memory's content with the configured provider. Memories
/// whose id already exists are skipped; connections ride along as-is (targets
/// are soft references, so edges into not-yet-imported memories are fine).
pub async fn import(config: &MnemaConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: ImportData =
        serde_json::from_str(&json).context("failed to parse import JSON")?;

    let mut manager = super::open_manager(config)?;

    println!("Importing {} memories...", data.memories.len());
    let report = manager.import(data.memories).await?;

    println!("Import complete:");
    println!("  Memories imported: {}", report.imported);
    println!("  Memories skipped:  {} (already exist)", report.skipped);
    Ok(())
}
