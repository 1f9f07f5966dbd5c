//! Memory orchestration — creation, graph mutations, retrieval.
//!
//! [`MemoryManager`] is the only component that creates memories. It owns the
//! graph collection (memories with their connections), drives the vector
//! store in lockstep, and persists both through the same storage port under
//! separate keys. The two collections are kept in sync by these operations —
//! never assumed consistent by construction.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MnemaConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::llm::ChatModel;
use crate::memory::extract::{resolve_target, TargetResolver};
use crate::memory::related::{self, RelatedMemory};
use crate::memory::types::{
    Connection, ConnectionKind, Memory, MemoryKind, MemoryMetadata, ScoredMemory,
};
use crate::memory::vector_store::VectorStore;
use crate::storage::StoragePort;

/// Storage key for the persisted memory collection.
pub const MEMORIES_KEY: &str = "memories";

/// Parameters for a user-initiated single add.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub kind: MemoryKind,
    pub content: String,
    pub source: String,
    /// Defaults to 1.0 when unspecified.
    pub confidence: Option<f64>,
    pub metadata: MemoryMetadata,
}

/// Collection statistics.
#[derive(Debug, Serialize)]
pub struct MemoryStats {
    pub total_memories: usize,
    pub by_kind: HashMap<String, usize>,
    pub total_connections: usize,
    pub distinct_tags: usize,
    pub vector_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<String>,
}

/// Outcome of a bulk import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

pub struct MemoryManager {
    pub(crate) store: VectorStore,
    pub(crate) chat: Box<dyn ChatModel>,
    pub(crate) memories: Vec<Memory>,
    pub(crate) storage: Arc<dyn StoragePort>,
    pub(crate) resolver: TargetResolver,
    pub(crate) config: MnemaConfig,
}

impl MemoryManager {
    /// Open the manager, loading both persisted collections.
    ///
    /// Load failures degrade to empty collections (fail open) so the app
    /// stays usable with an empty memory set rather than crashing at start.
    pub fn open(
        config: MnemaConfig,
        provider: Box<dyn EmbeddingProvider>,
        chat: Box<dyn ChatModel>,
        storage: Arc<dyn StoragePort>,
    ) -> Self {
        let store = VectorStore::open(provider, Arc::clone(&storage));
        let memories = match Self::load_memories(storage.as_ref()) {
            Ok(memories) => memories,
            Err(e) => {
                warn!("failed to load memory collection, starting empty: {e}");
                Vec::new()
            }
        };
        debug!(count = memories.len(), "memory manager opened");
        Self {
            store,
            chat,
            memories,
            storage,
            resolver: resolve_target,
            config,
        }
    }

    /// Swap the connection-target resolution strategy.
    pub fn with_resolver(mut self, resolver: TargetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    fn load_memories(storage: &dyn StoragePort) -> Result<Vec<Memory>> {
        match storage.load(MEMORIES_KEY)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| Error::StorageLoad(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    pub fn get(&self, id: &str) -> Option<&Memory> {
        self.memories.iter().find(|m| m.id == id)
    }

    pub fn list(&self) -> &[Memory] {
        &self.memories
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    // ── Creation and removal ──────────────────────────────────────────────────

    /// Create a single memory with a fresh id and timestamp.
    ///
    /// The vector twin is written first; if embedding fails nothing is
    /// stored anywhere. If the graph persist fails afterwards, the vector
    /// record is rolled back best-effort so no half-committed pair remains.
    pub async fn add(&mut self, new: NewMemory) -> Result<Memory> {
        let mut memory = Memory::new(new.kind, new.content, new.source);
        memory.confidence = new.confidence.unwrap_or(1.0);
        memory.metadata = new.metadata;
        if memory.metadata.workspace.is_none() {
            memory.metadata.workspace = Some(self.config.storage.workspace.clone());
        }
        self.insert(memory.clone()).await?;
        info!(id = %memory.id, kind = %memory.kind, "memory added");
        Ok(memory)
    }

    /// Insert a fully-formed memory into both collections.
    pub(crate) async fn insert(&mut self, memory: Memory) -> Result<()> {
        self.store.upsert(&memory).await?;
        self.memories.push(memory);
        if let Err(e) = self.persist_memories() {
            // Unwind so the vector store does not keep an orphan record.
            let orphan = self.memories.pop();
            if let Some(orphan) = orphan {
                if let Err(rollback) = self.store.delete(&orphan.id) {
                    warn!(id = %orphan.id, "rollback of vector record failed: {rollback}");
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a memory and its vector twin.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.memories.len();
        self.memories.retain(|m| m.id != id);
        if self.memories.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        self.persist_memories()?;
        self.store.delete(id)?;
        info!(%id, "memory removed");
        Ok(())
    }

    /// Remove everything from both collections.
    pub fn clear(&mut self) -> Result<()> {
        self.memories.clear();
        self.persist_memories()?;
        self.store.clear()?;
        info!("memory collections cleared");
        Ok(())
    }

    // ── Graph mutations ───────────────────────────────────────────────────────

    /// Upsert an outgoing edge on the source memory. Last write wins per
    /// ordered (source, target) pair — no multi-edges in one direction.
    /// The target is a soft reference and is not validated to exist.
    pub fn add_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: ConnectionKind,
        strength: f64,
        description: Option<String>,
    ) -> Result<()> {
        let memory = self
            .memories
            .iter_mut()
            .find(|m| m.id == source_id)
            .ok_or_else(|| Error::NotFound(source_id.to_string()))?;

        memory.upsert_connection(Connection {
            kind,
            target_id: target_id.to_string(),
            strength,
            description,
        });
        self.persist_memories()
    }

    /// Remove the edge source→target if present; no-op otherwise.
    pub fn remove_connection(&mut self, source_id: &str, target_id: &str) -> Result<()> {
        let Some(memory) = self.memories.iter_mut().find(|m| m.id == source_id) else {
            return Ok(());
        };
        if memory.remove_connection(target_id) {
            self.persist_memories()?;
        }
        Ok(())
    }

    /// Replace a memory's tags and re-sync the stored projection.
    ///
    /// Content is unchanged, so the vector store reuses the prior embedding
    /// rather than calling the provider again.
    pub async fn update_tags(&mut self, id: &str, tags: Vec<String>) -> Result<()> {
        let pos = self
            .memories
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut updated = self.memories[pos].clone();
        updated.metadata.tags = tags;

        self.store.upsert(&updated).await?;
        self.memories[pos] = updated;
        self.persist_memories()
    }

    // ── Retrieval ─────────────────────────────────────────────────────────────

    /// Similarity search over the vector store.
    pub async fn find_similar(
        &self,
        query: &str,
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<ScoredMemory>> {
        self.store.find_similar(query, limit, min_similarity).await
    }

    /// Rank the memories related to `id` by combined explicit + semantic
    /// strength. Unknown ids yield an empty list.
    pub async fn find_related(&self, id: &str) -> Result<Vec<RelatedMemory>> {
        related::find_related(
            &self.store,
            &self.memories,
            id,
            self.config.retrieval.semantic_floor,
            self.config.retrieval.related_limit,
        )
        .await
    }

    // ── Maintenance ───────────────────────────────────────────────────────────

    /// Collection statistics.
    pub fn stats(&self) -> MemoryStats {
        let mut by_kind: HashMap<String, usize> = HashMap::new();
        let mut tags: Vec<&str> = Vec::new();
        let mut total_connections = 0;
        for memory in &self.memories {
            *by_kind.entry(memory.kind.as_str().to_string()).or_insert(0) += 1;
            total_connections += memory.connections.len();
            for tag in &memory.metadata.tags {
                if !tags.contains(&tag.as_str()) {
                    tags.push(tag);
                }
            }
        }

        MemoryStats {
            total_memories: self.memories.len(),
            by_kind,
            total_connections,
            distinct_tags: tags.len(),
            vector_records: self.store.len(),
            oldest_memory: self
                .memories
                .iter()
                .map(|m| m.created_at.as_str())
                .min()
                .map(str::to_string),
            newest_memory: self
                .memories
                .iter()
                .map(|m| m.created_at.as_str())
                .max()
                .map(str::to_string),
        }
    }

    /// Regenerate every stored embedding with the current provider.
    pub async fn re_embed(&mut self) -> Result<usize> {
        self.store.re_embed().await
    }

    /// Import memories wholesale, keeping their ids, timestamps, and
    /// connections. Existing ids are skipped; content is re-embedded.
    pub async fn import(&mut self, memories: Vec<Memory>) -> Result<ImportReport> {
        let mut imported = 0;
        let mut skipped = 0;
        for memory in memories {
            if self.get(&memory.id).is_some() {
                skipped += 1;
                continue;
            }
            self.insert(memory).await?;
            imported += 1;
        }
        info!(imported, skipped, "import complete");
        Ok(ImportReport { imported, skipped })
    }

    fn persist_memories(&self) -> Result<()> {
        let json = serde_json::to_string(&self.memories)
            .map_err(|e| Error::StorageSave(e.to_string()))?;
        self.storage.save(MEMORIES_KEY, &json)
    }
}
