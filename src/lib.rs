//! Persistent semantic memory and knowledge graph for AI chat clients.
//!
//! Mnema gives a chat client a memory layer: facts, concepts, and
//! relationships extracted from conversation, stored with their embeddings,
//! linked into a lightweight knowledge graph, and retrievable by similarity.
//! Memories carry directed, typed, weighted connections to other memories;
//! retrieval blends explicit graph edges with embedding similarity into one
//! ranked list.
//!
//! # Architecture
//!
//! - **Storage**: a pluggable key-value port ([`storage::StoragePort`]) with
//!   a SQLite implementation; the vector collection and the memory graph are
//!   persisted under separate keys and kept in sync by the manager
//! - **Embeddings**: any OpenAI-compatible hosted endpoint behind the
//!   [`embedding::EmbeddingProvider`] trait
//! - **Search**: linear-scan cosine similarity — deliberate at the target
//!   collection sizes, swappable behind the vector-store interface
//! - **Extraction**: an OpenAI-compatible chat model turns conversation text
//!   into structured memory candidates, best-effort
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`storage`] — The persistence port and its SQLite / in-memory implementations
//! - [`embedding`] — Text-to-vector embedding adapters
//! - [`llm`] — Chat-model adapters for the extraction call
//! - [`memory`] — Core memory engine: types, vector store, ranking, extraction

pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod memory;
pub mod storage;

pub use error::{Error, Result};
