use anyhow::Result;

use mnema::config::MnemaConfig;
use mnema::memory::manager::NewMemory;
use mnema::memory::types::{MemoryKind, MemoryMetadata};

/// Store a single memory from the terminal.
pub async fn add(
    config: &MnemaConfig,
    content: &str,
    kind: MemoryKind,
    source: Option<&str>,
    confidence: Option<f64>,
    tags: Vec<String>,
    workspace: Option<String>,
    thread: Option<String>,
) -> Result<()> {
    let mut manager = super::open_manager(config)?;

    let memory = manager
        .add(NewMemory {
            kind,
            content: content.to_string(),
            source: source.unwrap_or("manual").to_string(),
            confidence,
            metadata: MemoryMetadata {
                workspace,
                thread,
                context: None,
                tags,
                extra: Default::default(),
            },
        })
        .await?;

    println!("Stored [{}] {}", memory.kind, memory.id);
    Ok(())
}
