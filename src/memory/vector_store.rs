//! Embedding-indexed persistence and similarity search.
//!
//! [`VectorStore`] keeps an insertion-ordered collection of [`StoredVector`]
//! records: embed on write, linear-scan cosine on read, persist through the
//! storage port after every successful mutation. Linear scan is deliberate —
//! collections stay in the hundreds per session, and the interface leaves
//! room to swap in an indexed nearest-neighbor structure without touching
//! callers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::memory::similarity::cosine_similarity;
use crate::memory::types::{Memory, ScoredMemory, StoredVector};
use crate::storage::StoragePort;

/// Storage key for the persisted vector collection.
pub const VECTORS_KEY: &str = "vectors";

pub struct VectorStore {
    provider: Box<dyn EmbeddingProvider>,
    storage: Arc<dyn StoragePort>,
    records: Vec<StoredVector>,
}

impl VectorStore {
    /// Open the store, loading any persisted collection.
    ///
    /// A load failure is logged and degrades to an empty collection so a
    /// corrupt or unreadable record cannot take the whole app down. Write
    /// failures, by contrast, always propagate.
    pub fn open(provider: Box<dyn EmbeddingProvider>, storage: Arc<dyn StoragePort>) -> Self {
        let records = match Self::load_records(storage.as_ref()) {
            Ok(records) => records,
            Err(e) => {
                warn!("failed to load vector collection, starting empty: {e}");
                Vec::new()
            }
        };
        debug!(count = records.len(), "vector store opened");
        Self {
            provider,
            storage,
            records,
        }
    }

    fn load_records(storage: &dyn StoragePort) -> Result<Vec<StoredVector>> {
        match storage.load(VECTORS_KEY)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| Error::StorageLoad(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Insert or replace the record for `memory.id`.
    ///
    /// Embeds `memory.content` first; an existing record with identical
    /// content donates its embedding so tag-only updates skip the provider
    /// call. On embedding failure the error propagates and the prior record
    /// for that id is left untouched — no partial write.
    pub async fn upsert(&mut self, memory: &Memory) -> Result<()> {
        let existing = self.records.iter().position(|r| r.id == memory.id);

        let embedding = match existing {
            Some(pos) if self.records[pos].content == memory.content => {
                self.records[pos].embedding.clone()
            }
            _ => self.provider.embed(&memory.content).await?,
        };

        let record = StoredVector::from_memory(memory, embedding);
        match existing {
            Some(pos) => self.records[pos] = record,
            None => self.records.push(record),
        }

        self.persist()
    }

    /// Remove the record with `id` if present. Idempotent — absent ids are
    /// not an error and do not touch durable state.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() != before {
            self.persist()?;
        }
        Ok(())
    }

    /// Remove every record and persist the empty collection.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.persist()
    }

    /// Rank all stored records by cosine similarity to `query`.
    ///
    /// Scores below `min_similarity` are filtered out entirely. The sort is
    /// stable and descending, so equal scores keep insertion order. Results
    /// are memory-shaped projections with empty connections.
    pub async fn find_similar(
        &self,
        query: &str,
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<ScoredMemory>> {
        let query_embedding = self.provider.embed(query).await?;

        let mut matches: Vec<ScoredMemory> = Vec::new();
        for record in &self.records {
            let similarity = cosine_similarity(&query_embedding, &record.embedding)?;
            if similarity < min_similarity {
                continue;
            }
            matches.push(ScoredMemory {
                memory: record.to_memory(),
                similarity,
            });
        }

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(limit);
        Ok(matches)
    }

    /// Regenerate every stored embedding with the current provider, one
    /// record at a time. Returns the number of records re-embedded.
    ///
    /// This is the recovery path after an embedding-model change leaves the
    /// collection with stale dimensions.
    pub async fn re_embed(&mut self) -> Result<usize> {
        let mut fresh = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let embedding = self.provider.embed(&record.content).await?;
            let mut updated = record.clone();
            updated.embedding = embedding;
            fresh.push(updated);
        }
        let count = fresh.len();
        self.records = fresh;
        self.persist()?;
        Ok(count)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| Error::StorageSave(e.to_string()))?;
        self.storage.save(VECTORS_KEY, &json)
    }
}
