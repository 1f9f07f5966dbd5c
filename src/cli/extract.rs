use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use mnema::config::MnemaConfig;

/// Extract memories from conversation text supplied via file or stdin.
pub async fn extract(config: &MnemaConfig, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        println!("Nothing to extract from.");
        return Ok(());
    }

    let mut manager = super::open_manager(config)?;
    let created = manager.extract_from_conversation(&text, &[]).await;

    if created.is_empty() {
        println!("No memories extracted.");
        return Ok(());
    }

    println!("Extracted {} memorie(s):\n", created.len());
    for memory in &created {
        println!("  [{}] {}", memory.kind, memory.id);
        println!("     {}", super::preview(&memory.content, 120));
        if !memory.connections.is_empty() {
            for connection in &memory.connections {
                println!(
                    "     -[{}]-> {} (strength: {:.2})",
                    connection.kind, connection.target_id, connection.strength
                );
            }
        }
        println!();
    }

    Ok(())
}
