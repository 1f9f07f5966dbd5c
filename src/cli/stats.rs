use anyhow::Result;

use mnema::config::MnemaConfig;

/// Display memory statistics in the terminal.
pub fn stats(config: &MnemaConfig) -> Result<()> {
    let manager = super::open_manager(config)?;
    let response = manager.stats();

    println!("Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total memories:      {}", response.total_memories);
    println!("  Vector records:      {}", response.vector_records);
    println!();

    println!("By Kind:");
    for kind in &["fact", "concept", "relationship"] {
        let count = response.by_kind.get(*kind).copied().unwrap_or(0);
        println!("  {:<14} {}", kind, count);
    }
    println!();

    println!("Connections:           {}", response.total_connections);
    println!("Distinct tags:         {}", response.distinct_tags);

    if let Some(ref oldest) = response.oldest_memory {
        println!("Oldest memory:         {oldest}");
    }
    if let Some(ref newest) = response.newest_memory {
        println!("Newest memory:         {newest}");
    }

    Ok(())
}
