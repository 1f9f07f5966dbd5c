mod helpers;

use helpers::{
    add_fact, manager_with, FailingChat, FailingEmbedder, StubChat, StubEmbedder,
};
use mnema::memory::types::{ConnectionKind, Memory, MemoryKind};

const EXTRACTION_JSON: &str = r#"{
    "memories": [
        {
            "type": "fact",
            "content": "The user's staging cluster runs Kubernetes 1.29",
            "confidence": 0.9,
            "connections": [
                {
                    "type": "related_to",
                    "targetContent": "staging cluster",
                    "strength": 0.8,
                    "description": "same environment"
                }
            ],
            "metadata": { "tags": ["infra", "staging"] }
        },
        {
            "type": "concept",
            "content": "cluster upgrade cadence"
        }
    ]
}"#;

#[tokio::test]
async fn extraction_creates_memories_with_ids_and_timestamps() {
    let mut manager = manager_with(StubEmbedder::new(), StubChat::new(EXTRACTION_JSON));

    let created = manager
        .extract_from_conversation("We moved the staging cluster to 1.29 yesterday", &[])
        .await;

    assert_eq!(created.len(), 2);
    for memory in &created {
        assert!(!memory.id.is_empty());
        assert!(!memory.created_at.is_empty());
        assert!(manager.get(&memory.id).is_some());
    }
    assert_eq!(created[0].kind, MemoryKind::Fact);
    assert!((created[0].confidence - 0.9).abs() < f64::EPSILON);
    assert_eq!(
        created[0].metadata.tags,
        vec!["infra".to_string(), "staging".to_string()]
    );
    // Unspecified confidence defaults to 1.0
    assert!((created[1].confidence - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn extraction_persists_into_the_vector_store() {
    let mut manager = manager_with(StubEmbedder::new(), StubChat::new(EXTRACTION_JSON));

    let created = manager.extract_from_conversation("conversation text", &[]).await;

    let results = manager
        .find_similar("The user's staging cluster runs Kubernetes 1.29", 1, 0.0)
        .await
        .unwrap();
    assert_eq!(results[0].memory.id, created[0].id);
}

#[tokio::test]
async fn proposed_connections_resolve_by_content_match() {
    let mut manager = manager_with(StubEmbedder::new(), StubChat::new(EXTRACTION_JSON));
    let existing = add_fact(&mut manager, "The staging cluster lives in us-east-1").await;

    let created = manager
        .extract_from_conversation("More details about the staging cluster", &[])
        .await;

    // "staging cluster" is a case-insensitive substring of the existing
    // memory's content, so the proposed connection resolves to its id
    let edge = created[0].connection_to(&existing.id).unwrap();
    assert_eq!(edge.kind, ConnectionKind::RelatedTo);
    assert!((edge.strength - 0.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unresolvable_connections_are_dropped_silently() {
    // No stored memory mentions a staging cluster, so the proposed target
    // has nothing to match against
    let mut manager = manager_with(StubEmbedder::new(), StubChat::new(EXTRACTION_JSON));
    add_fact(&mut manager, "completely unrelated note about lunch").await;

    let created = manager.extract_from_conversation("conversation", &[]).await;

    assert_eq!(created.len(), 2);
    assert!(created[0].connections.is_empty());
}

#[tokio::test]
async fn explicitly_supplied_memories_join_the_context_pool() {
    let mut manager = manager_with(StubEmbedder::new(), StubChat::new(EXTRACTION_JSON));

    // Not stored anywhere — handed in directly by the caller
    let external = Memory::new(
        MemoryKind::Fact,
        "notes on the staging cluster rollout",
        "chat",
    );

    let created = manager
        .extract_from_conversation("conversation", std::slice::from_ref(&external))
        .await;

    assert!(created[0].connection_to(&external.id).is_some());
}

#[tokio::test]
async fn malformed_model_output_degrades_to_empty() {
    let mut manager = manager_with(
        StubEmbedder::new(),
        StubChat::new("Sure! Here are some memories I noticed:"),
    );

    let created = manager.extract_from_conversation("conversation", &[]).await;

    assert!(created.is_empty());
    assert!(manager.is_empty());
}

#[tokio::test]
async fn model_failure_degrades_to_empty() {
    let mut manager = manager_with(StubEmbedder::new(), FailingChat);

    let created = manager.extract_from_conversation("conversation", &[]).await;

    assert!(created.is_empty());
}

#[tokio::test]
async fn embedding_failure_degrades_to_empty() {
    let mut manager = manager_with(FailingEmbedder, StubChat::new(EXTRACTION_JSON));

    let created = manager.extract_from_conversation("conversation", &[]).await;

    assert!(created.is_empty());
    assert!(manager.is_empty());
}
