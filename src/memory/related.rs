//! Combined relevance ranking for related-memory retrieval.
//!
//! Two signals feed the ranking: explicit graph edges (in either direction)
//! and semantic similarity from the vector store. Combined strength is the
//! MAX of the two — a strong explicit edge surfaces a memory even with low
//! semantic overlap, and vice versa; the signals are never summed or
//! averaged, which would require calibrating two differently-scaled scores
//! against each other.

use crate::error::Result;
use crate::memory::types::Memory;
use crate::memory::vector_store::VectorStore;
use serde::Serialize;

/// A related-memory hit with its combined relatedness strength.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedMemory {
    pub memory: Memory,
    pub strength: f64,
}

/// Rank the memories related to `id`.
///
/// Unknown ids return an empty list, not an error — the id may reference a
/// since-deleted memory. Explicit strength per candidate is the max of edge
/// strengths target→candidate and candidate→target, clamped into `[0, 1]`
/// since stored strengths are not validated on write. Semantic strength is
/// the cosine similarity from a `find_similar` pass over the target's
/// content, floor-gated: below `semantic_floor` the signal is zero, not
/// merely small.
///
/// Candidates are discovered explicit-first, then a single stable descending
/// sort runs over the union — so semantic-only matches land after explicit
/// matches of equal strength. Edge targets that no longer resolve to a
/// memory are skipped at materialization.
pub async fn find_related(
    store: &VectorStore,
    memories: &[Memory],
    id: &str,
    semantic_floor: f32,
    semantic_limit: usize,
) -> Result<Vec<RelatedMemory>> {
    let Some(target) = memories.iter().find(|m| m.id == id) else {
        return Ok(Vec::new());
    };

    // Discovery order matters for tie-breaking: explicit candidates first.
    let mut ranked: Vec<(String, f64)> = Vec::new();

    for connection in &target.connections {
        merge_max(&mut ranked, &connection.target_id, clamp01(connection.strength));
    }

    // Edges are directional and there are no stored back-edges, so inbound
    // strength comes from a scan.
    for memory in memories {
        if memory.id == target.id {
            continue;
        }
        for connection in &memory.connections {
            if connection.target_id == target.id {
                merge_max(&mut ranked, &memory.id, clamp01(connection.strength));
            }
        }
    }

    let semantic = store
        .find_similar(&target.content, semantic_limit, semantic_floor)
        .await?;
    for scored in &semantic {
        if scored.memory.id == target.id {
            continue;
        }
        merge_max(&mut ranked, &scored.memory.id, f64::from(scored.similarity));
    }

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ranked
        .into_iter()
        .filter_map(|(candidate_id, strength)| {
            memories
                .iter()
                .find(|m| m.id == candidate_id)
                .map(|m| RelatedMemory {
                    memory: m.clone(),
                    strength,
                })
        })
        .collect())
}

fn merge_max(ranked: &mut Vec<(String, f64)>, id: &str, strength: f64) {
    match ranked.iter_mut().find(|(candidate, _)| candidate == id) {
        Some(entry) => entry.1 = entry.1.max(strength),
        None => ranked.push((id.to_string(), strength)),
    }
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
