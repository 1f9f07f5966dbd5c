//! Text-to-vector embedding adapters.
//!
//! Provides the [`EmbeddingProvider`] trait and an OpenAI-compatible hosted
//! implementation. The provider is created via [`create_provider`] from
//! configuration; the rest of the crate only ever sees the trait, so a local
//! model can be slotted in without touching callers.

pub mod openai;

use async_trait::async_trait;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

/// Trait for embedding text into vectors.
///
/// Implementations produce vectors of exactly [`dimensions`](Self::dimensions)
/// length. Identical text must yield embeddings usable for stable similarity
/// comparison; exact determinism is not required. A failed embed is an
/// [`Error::Embedding`] — implementations never substitute a zero vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Number of dimensions this provider produces.
    fn dimensions(&self) -> usize;
}

/// Create an embedding provider from config.
///
/// Currently only `"openai"` (any OpenAI-compatible `/embeddings` endpoint)
/// is supported.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = openai::OpenAiEmbeddings::new(config)?;
            Ok(Box::new(provider))
        }
        other => Err(Error::Config(format!(
            "unknown embedding provider: {other}. Supported: openai"
        ))),
    }
}
