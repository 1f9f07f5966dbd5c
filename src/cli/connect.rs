use anyhow::Result;

use mnema::config::MnemaConfig;
use mnema::memory::types::ConnectionKind;

/// Create (or replace) a directed connection between two memories.
pub fn connect(
    config: &MnemaConfig,
    source_id: &str,
    target_id: &str,
    kind: ConnectionKind,
    strength: f64,
    description: Option<String>,
) -> Result<()> {
    let mut manager = super::open_manager(config)?;
    manager.add_connection(source_id, target_id, kind, strength, description)?;
    println!("Connected {source_id} -[{kind}]-> {target_id} (strength: {strength:.2})");
    Ok(())
}

/// Remove the directed connection source → target, if present.
pub fn disconnect(config: &MnemaConfig, source_id: &str, target_id: &str) -> Result<()> {
    let mut manager = super::open_manager(config)?;
    manager.remove_connection(source_id, target_id)?;
    println!("Disconnected {source_id} -> {target_id}");
    Ok(())
}
