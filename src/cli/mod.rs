pub mod add;
pub mod connect;
pub mod export;
pub mod extract;
pub mod forget;
pub mod import;
pub mod re_embed;
pub mod related;
pub mod reset;
pub mod search;
pub mod stats;
pub mod tag;

use anyhow::Result;
use std::sync::Arc;

use mnema::config::MnemaConfig;
use mnema::memory::manager::MemoryManager;
use mnema::storage::SqliteStorage;

/// Construct a fully wired manager over the configured database.
pub fn open_manager(config: &MnemaConfig) -> Result<MemoryManager> {
    let storage = Arc::new(SqliteStorage::open(config.resolved_db_path())?);
    let provider = mnema::embedding::create_provider(&config.embedding)?;
    let chat = mnema::llm::create_model(&config.extraction)?;
    Ok(MemoryManager::open(
        config.clone(),
        provider,
        chat,
        storage,
    ))
}

/// Truncate content to max_chars, appending "..." if truncated.
pub(crate) fn preview(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        content.to_string()
    } else {
        let end = content
            .char_indices()
            .take_while(|(i, _)| *i < max_chars)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(max_chars);
        format!("{}...", &content[..end])
    }
}
