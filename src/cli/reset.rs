//! CLI `reset` command — delete all memories after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use mnema::config::MnemaConfig;

/// Delete all memories after user confirmation.
pub fn reset(config: &MnemaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL memories and connections.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut manager = super::open_manager(config)?;
    manager.clear()?;

    println!("All memories deleted. Database reset complete.");
    Ok(())
}
