//! Core memory type definitions.
//!
//! Defines [`MemoryKind`] (the three memory categories), [`ConnectionKind`]
//! (edge labels), [`Memory`] (a full record with its outgoing edges),
//! [`StoredVector`] (the vector store's internal record), and
//! [`ScoredMemory`] (a similarity-search hit).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The three memory categories extracted from conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// A discrete, checkable statement.
    Fact,
    /// An abstract idea or topic the conversation keeps returning to.
    Concept,
    /// A statement about how two things relate.
    Relationship,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fact => "fact",
            Self::Concept => "concept",
            Self::Relationship => "relationship",
        }
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fact" => Ok(Self::Fact),
            "concept" => Ok(Self::Concept),
            "relationship" => Ok(Self::Relationship),
            _ => Err(format!("unknown memory kind: {s}")),
        }
    }
}

/// Edge labels for connections between memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    RelatedTo,
    PartOf,
    DependsOn,
    Causes,
    SimilarTo,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelatedTo => "related_to",
            Self::PartOf => "part_of",
            Self::DependsOn => "depends_on",
            Self::Causes => "causes",
            Self::SimilarTo => "similar_to",
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "related_to" => Ok(Self::RelatedTo),
            "part_of" => Ok(Self::PartOf),
            "depends_on" => Ok(Self::DependsOn),
            "causes" => Ok(Self::Causes),
            "similar_to" => Ok(Self::SimilarTo),
            _ => Err(format!("unknown connection kind: {s}")),
        }
    }
}

/// A directed, typed, weighted edge owned by its source memory.
///
/// `target_id` is a soft reference: it is not validated to exist when the
/// edge is created, and a dangling edge is simply unresolvable at lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub target_id: String,
    /// Caller-supplied weight, nominally in `[0.0, 1.0]`. Not clamped on
    /// write; ranking clamps defensively.
    pub strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Open metadata carried on a memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Order-preserving for display; membership checks ignore order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A memory record: content plus its outgoing connection edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v7 (time-sortable), generated at creation, immutable.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    /// Source text, immutable once stored — edits replace the record.
    pub content: String,
    /// Provenance, e.g. an excerpt of the originating conversation.
    pub source: String,
    /// Confidence in `[0.0, 1.0]`; defaults to 1.0.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// RFC 3339 creation timestamp, assigned at insertion.
    pub created_at: String,
    /// Ordered outgoing edges; at most one per distinct target id.
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: MemoryMetadata,
}

fn default_confidence() -> f64 {
    1.0
}

impl Memory {
    /// Build a new memory with a fresh time-sortable id and timestamp.
    pub fn new(kind: MemoryKind, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            kind,
            content: content.into(),
            source: source.into(),
            confidence: 1.0,
            created_at: chrono::Utc::now().to_rfc3339(),
            connections: Vec::new(),
            metadata: MemoryMetadata::default(),
        }
    }

    /// Insert or replace the outgoing edge to `connection.target_id`.
    ///
    /// Last write wins: an existing edge to the same target is replaced in
    /// place, keeping its position in the ordered list.
    pub fn upsert_connection(&mut self, connection: Connection) {
        match self
            .connections
            .iter_mut()
            .find(|c| c.target_id == connection.target_id)
        {
            Some(existing) => *existing = connection,
            None => self.connections.push(connection),
        }
    }

    /// Remove the outgoing edge to `target_id`. Returns `true` if an edge
    /// was removed.
    pub fn remove_connection(&mut self, target_id: &str) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.target_id != target_id);
        self.connections.len() != before
    }

    /// The outgoing edge to `target_id`, if any.
    pub fn connection_to(&self, target_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.target_id == target_id)
    }
}

/// The vector store's internal record, derived from a [`Memory`].
///
/// Connections are deliberately absent — the store is a pure
/// content+embedding index and the graph lives only in the memory collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVector {
    pub id: String,
    pub embedding: Vec<f32>,
    pub content: String,
    pub metadata: VectorMetadata,
}

/// Metadata projection carried alongside each stored embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMetadata {
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub source: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StoredVector {
    pub fn from_memory(memory: &Memory, embedding: Vec<f32>) -> Self {
        Self {
            id: memory.id.clone(),
            embedding,
            content: memory.content.clone(),
            metadata: VectorMetadata {
                kind: memory.kind,
                source: memory.source.clone(),
                confidence: memory.confidence,
                workspace: memory.metadata.workspace.clone(),
                thread: memory.metadata.thread.clone(),
                created_at: memory.created_at.clone(),
                tags: memory.metadata.tags.clone(),
            },
        }
    }

    /// Reconstruct a memory-shaped projection. Connections come back empty
    /// because the store does not own graph data.
    pub fn to_memory(&self) -> Memory {
        Memory {
            id: self.id.clone(),
            kind: self.metadata.kind,
            content: self.content.clone(),
            source: self.metadata.source.clone(),
            confidence: self.metadata.confidence,
            created_at: self.metadata.created_at.clone(),
            connections: Vec::new(),
            metadata: MemoryMetadata {
                workspace: self.metadata.workspace.clone(),
                thread: self.metadata.thread.clone(),
                context: None,
                tags: self.metadata.tags.clone(),
                extra: BTreeMap::new(),
            },
        }
    }
}

/// A similarity-search hit: the reconstructed memory projection and its
/// cosine similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMemory {
    pub memory: Memory,
    pub similarity: f32,
}
