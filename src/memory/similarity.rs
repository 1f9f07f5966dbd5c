//! Cosine similarity over embedding vectors.

use crate::error::{Error, Result};

/// Cosine similarity between two equal-length vectors, in `[-1.0, 1.0]`.
///
/// Mismatched lengths are a data-integrity problem (typically stale stored
/// embeddings after an embedding-model change) and return
/// [`Error::DimensionMismatch`] rather than a degraded score. A zero-magnitude
/// vector on either side yields `0.0` — a defined minimal-similarity result,
/// not an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
