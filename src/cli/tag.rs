use anyhow::Result;

use mnema::config::MnemaConfig;

/// Replace a memory's tags.
pub async fn tag(config: &MnemaConfig, id: &str, tags: Vec<String>) -> Result<()> {
    let mut manager = super::open_manager(config)?;
    manager.update_tags(id, tags.clone()).await?;
    if tags.is_empty() {
        println!("Cleared tags on {id}");
    } else {
        println!("Tagged {id}: {}", tags.join(", "));
    }
    Ok(())
}
