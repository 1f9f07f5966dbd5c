//! Conversation extraction pipeline.
//!
//! Asks the chat model to pull structured memory candidates out of raw
//! conversation text, resolves each candidate's proposed connections against
//! the known-memory pool, and persists the survivors. Extraction is an
//! enhancement, not a critical path: any failure along the way — model
//! transport, malformed output, embedding during persistence — is logged and
//! degrades to an empty result so the surrounding chat flow never blocks.

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::memory::manager::MemoryManager;
use crate::memory::types::{Connection, ConnectionKind, Memory, MemoryKind};

/// Strategy for resolving a proposed connection target — named by its
/// descriptive content, since the model does not know ids — to a concrete
/// memory in the pool. Isolated so substring matching can later be replaced
/// with embedding-based matching without touching the pipeline.
pub type TargetResolver = fn(&str, &[Memory]) -> Option<String>;

/// Default resolver: case-insensitive substring containment in either
/// direction; first match in pool order wins.
pub fn resolve_target(candidate: &str, pool: &[Memory]) -> Option<String> {
    let needle = candidate.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    pool.iter()
        .find(|memory| {
            let content = memory.content.to_lowercase();
            content.contains(&needle) || needle.contains(&content)
        })
        .map(|memory| memory.id.clone())
}

pub(crate) const EXTRACTION_SYSTEM_PROMPT: &str = "\
You extract structured memories from conversation text.

Respond with JSON only, no prose, matching exactly this shape:
{
  \"memories\": [
    {
      \"type\": \"fact\" | \"concept\" | \"relationship\",
      \"content\": \"one self-contained statement\",
      \"confidence\": 0.9,
      \"connections\": [
        {
          \"type\": \"related_to\" | \"part_of\" | \"depends_on\" | \"causes\" | \"similar_to\",
          \"targetContent\": \"content of the existing memory this connects to\",
          \"strength\": 0.8,
          \"description\": \"why these are connected\"
        }
      ],
      \"metadata\": { \"tags\": [\"topic\"] }
    }
  ]
}

Only propose connections to memories listed in the known-memories section.
Return {\"memories\": []} when nothing is worth remembering.";

/// Format the context pool the way the model expects: one
/// `TYPE: content (ID: id)` line per memory.
pub(crate) fn format_context(memories: &[Memory]) -> String {
    memories
        .iter()
        .map(|m| format!("{}: {} (ID: {})", m.kind.as_str().to_uppercase(), m.content, m.id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn build_user_prompt(text: &str, context: &str) -> String {
    let context = if context.is_empty() { "(none)" } else { context };
    format!("Conversation:\n{text}\n\nKnown memories:\n{context}")
}

// ── Wire types for the model's response ───────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ExtractionOutput {
    #[serde(default)]
    memories: Vec<CandidateMemory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateMemory {
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub content: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub connections: Vec<CandidateConnection>,
    #[serde(default)]
    pub metadata: CandidateMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateConnection {
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    #[serde(rename = "targetContent")]
    pub target_content: String,
    #[serde(default = "default_strength")]
    pub strength: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidateMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_confidence() -> f64 {
    1.0
}

fn default_strength() -> f64 {
    0.5
}

/// Parse the model's raw output into memory candidates.
///
/// Tolerates a fenced code block around the JSON; anything else
/// non-conforming is an [`Error::ExtractionParse`].
pub(crate) fn parse_extraction(raw: &str) -> Result<Vec<CandidateMemory>> {
    let json = strip_code_fence(raw);
    let output: ExtractionOutput =
        serde_json::from_str(json).map_err(|e| Error::ExtractionParse(e.to_string()))?;
    Ok(output.memories)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Truncate conversation text to a provenance excerpt.
fn source_excerpt(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        text.to_string()
    } else {
        let end = text
            .char_indices()
            .take_while(|(i, _)| *i < max_chars)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(max_chars);
        format!("{}...", &text[..end])
    }
}

impl MemoryManager {
    /// Extract new memories from conversation text, best-effort.
    ///
    /// `existing` memories are merged into the context pool alongside the
    /// most-similar stored memories. Returns the newly created memories with
    /// ids and timestamps assigned; any failure degrades to an empty list.
    pub async fn extract_from_conversation(
        &mut self,
        text: &str,
        existing: &[Memory],
    ) -> Vec<Memory> {
        match self.try_extract(text, existing).await {
            Ok(created) => {
                info!(count = created.len(), "extraction complete");
                created
            }
            Err(e) => {
                warn!("extraction degraded to empty result: {e}");
                Vec::new()
            }
        }
    }

    async fn try_extract(&mut self, text: &str, existing: &[Memory]) -> Result<Vec<Memory>> {
        // 1. Context: up to N most-similar known memories, hydrated from the
        //    graph collection so the pool carries real ids.
        let limit = self.config.extraction.context_memories;
        let similar = self.store.find_similar(text, limit, 0.0).await?;
        let mut pool: Vec<Memory> = similar
            .iter()
            .filter_map(|scored| self.get(&scored.memory.id).cloned())
            .collect();

        // 2. Merge explicitly supplied memories, dedup by id.
        for memory in existing {
            if !pool.iter().any(|m| m.id == memory.id) {
                pool.push(memory.clone());
            }
        }

        // 3. Model call.
        let context = format_context(&pool);
        let raw = self
            .chat
            .complete(EXTRACTION_SYSTEM_PROMPT, &build_user_prompt(text, &context))
            .await?;

        // 4. Parse.
        let candidates = parse_extraction(&raw)?;

        // 5. Resolve connections and persist sequentially — one embedding
        //    call at a time, respecting provider rate limits.
        let source = source_excerpt(text, 160);
        let mut created = Vec::new();
        for candidate in candidates {
            let mut memory = Memory::new(candidate.kind, candidate.content, source.clone());
            memory.confidence = candidate.confidence;
            memory.metadata.tags = candidate.metadata.tags;

            for proposed in candidate.connections {
                // Unresolvable targets are dropped silently, not errors.
                let Some(target_id) = (self.resolver)(&proposed.target_content, &pool) else {
                    continue;
                };
                memory.upsert_connection(Connection {
                    kind: proposed.kind,
                    target_id,
                    strength: proposed.strength,
                    description: proposed.description,
                });
            }

            self.insert(memory.clone()).await?;
            created.push(memory);
        }

        Ok(created)
    }
}
