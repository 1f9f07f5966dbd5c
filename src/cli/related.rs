use anyhow::Result;

use mnema::config::MnemaConfig;

/// Show the memories related to a given id, ranked by combined strength.
pub async fn related(config: &MnemaConfig, id: &str) -> Result<()> {
    let manager = super::open_manager(config)?;

    let results = manager.find_related(id).await?;

    if results.is_empty() {
        println!("No related memories.");
        return Ok(());
    }

    println!("{} related memorie(s)\n", results.len());
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. [{}] {} (strength: {:.4})",
            i + 1,
            result.memory.kind,
            result.memory.id,
            result.strength,
        );
        println!("     {}", super::preview(&result.memory.content, 120));
        println!();
    }

    Ok(())
}
