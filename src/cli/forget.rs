use anyhow::Result;

use mnema::config::MnemaConfig;

/// Permanently remove a memory and its stored embedding.
pub async fn forget(config: &MnemaConfig, id: &str) -> Result<()> {
    let mut manager = super::open_manager(config)?;
    manager.remove(id).await?;
    println!("Forgot {id}");
    Ok(())
}
