#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use mnema::config::MnemaConfig;
use mnema::embedding::EmbeddingProvider;
use mnema::error::{Error, Result};
use mnema::llm::ChatModel;
use mnema::memory::manager::{MemoryManager, NewMemory};
use mnema::memory::types::{Memory, MemoryKind, MemoryMetadata};
use mnema::storage::{MemStorage, StoragePort};

pub const DIM: usize = 8;

/// Deterministic embedding provider: canned vectors for registered texts,
/// token-hash bag-of-words fallback for everything else. Identical text
/// always yields the identical vector.
pub struct StubEmbedder {
    canned: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self {
            canned: HashMap::new(),
            dimensions: DIM,
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            canned: HashMap::new(),
            dimensions,
        }
    }

    /// Register a fixed vector for an exact text.
    pub fn canned(mut self, text: &str, embedding: Vec<f32>) -> Self {
        self.canned.insert(text.to_string(), embedding);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(v) = self.canned.get(text) {
            return Ok(v.clone());
        }
        let mut v = vec![0.0f32; self.dimensions];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            v[(hasher.finish() as usize) % self.dimensions] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Provider that always fails — for atomicity and degradation tests.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Embedding("stub provider offline".into()))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Chat model returning a fixed response.
pub struct StubChat {
    response: String,
}

impl StubChat {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }

    /// A model that never finds anything worth remembering.
    pub fn empty() -> Self {
        Self::new(r#"{ "memories": [] }"#)
    }
}

#[async_trait]
impl ChatModel for StubChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Chat model that always fails.
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(Error::Completion("stub model offline".into()))
    }
}

/// Unit vector along the given dimension.
pub fn spike(dim: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    v[dim % DIM] = 1.0;
    v
}

/// Manager over in-memory storage with the given provider and chat model.
pub fn manager_with(
    embedder: impl EmbeddingProvider + 'static,
    chat: impl ChatModel + 'static,
) -> MemoryManager {
    MemoryManager::open(
        MnemaConfig::default(),
        Box::new(embedder),
        Box::new(chat),
        Arc::new(MemStorage::new()),
    )
}

/// Manager over a specific storage port, for persistence tests.
pub fn manager_over(
    storage: Arc<dyn StoragePort>,
    embedder: impl EmbeddingProvider + 'static,
    chat: impl ChatModel + 'static,
) -> MemoryManager {
    MemoryManager::open(
        MnemaConfig::default(),
        Box::new(embedder),
        Box::new(chat),
        storage,
    )
}

/// Default manager: hash-based embedder, extraction model that returns
/// nothing.
pub fn manager() -> MemoryManager {
    manager_with(StubEmbedder::new(), StubChat::empty())
}

/// Store a fact with defaults and return the created memory.
pub async fn add_fact(manager: &mut MemoryManager, content: &str) -> Memory {
    manager
        .add(NewMemory {
            kind: MemoryKind::Fact,
            content: content.to_string(),
            source: "test".to_string(),
            confidence: None,
            metadata: MemoryMetadata::default(),
        })
        .await
        .unwrap()
}
