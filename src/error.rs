//! Error taxonomy for the memory core.
//!
//! Library code returns [`Error`]; the CLI binary wraps it in `anyhow` at the
//! command boundary. Two variants carry a deliberate recovery policy:
//! [`Error::StorageLoad`] fails open (callers log it and start from an empty
//! collection) while [`Error::StorageSave`] fails closed (the caller must know
//! the mutation did not durably succeed).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The embedding provider could not produce a vector — unavailable model,
    /// empty/invalid input, or an auth/service failure. Never downgraded to a
    /// zero vector; the enclosing store/update operation aborts.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Similarity was requested over vectors of different lengths. Usually a
    /// stale stored embedding after an embedding-model change; surfaced loudly
    /// so the operator can run `mnema re-embed`.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Reading persisted state failed or the stored record did not parse.
    #[error("failed to load persisted state: {0}")]
    StorageLoad(String),

    /// Writing persisted state failed; the mutation is not durable.
    #[error("failed to persist state: {0}")]
    StorageSave(String),

    /// The chat model returned output that is not the expected JSON shape.
    /// Recovered inside extraction, which degrades to an empty result.
    #[error("could not parse extraction output: {0}")]
    ExtractionParse(String),

    /// The chat-model call itself failed (transport, auth, service error).
    #[error("chat completion failed: {0}")]
    Completion(String),

    /// An operation referenced a memory id that is not in the collection.
    #[error("memory not found: {0}")]
    NotFound(String),

    /// Configuration named an unknown provider or is otherwise unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
