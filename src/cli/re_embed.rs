//! CLI `re-embed` command — regenerate all embeddings with the current model.

use anyhow::Result;

use mnema::config::MnemaConfig;

/// Re-embed every stored memory with the currently configured model.
///
/// The repair path after an embedding-model change leaves the collection
/// with stale dimensions.
pub async fn re_embed(config: &MnemaConfig) -> Result<()> {
    let mut manager = super::open_manager(config)?;

    if manager.is_empty() {
        println!("No memories to re-embed.");
        return Ok(());
    }

    println!(
        "Re-embedding with model '{}'...",
        config.embedding.model
    );
    let count = manager.re_embed().await?;
    println!("Re-embedded {count} memories.");
    Ok(())
}
