//! Chat-model adapters for the extraction call.
//!
//! The memory core consumes text generation as an external collaborator:
//! given a system prompt and user content, return a string. [`create_model`]
//! builds the configured adapter; extraction only sees the [`ChatModel`]
//! trait.

pub mod openai;

use async_trait::async_trait;

use crate::config::ExtractionConfig;
use crate::error::Result;

/// Trait for chat-completion calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a single completion and return the assistant's text content.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Create a chat model from config.
///
/// Currently only OpenAI-compatible `/chat/completions` endpoints are
/// supported; the base URL decides which service actually answers.
pub fn create_model(config: &ExtractionConfig) -> Result<Box<dyn ChatModel>> {
    let model = openai::OpenAiChat::new(config)?;
    Ok(Box::new(model))
}
