mod helpers;

use std::sync::Arc;

use helpers::{add_fact, manager, spike, FailingEmbedder, StubChat, StubEmbedder};
use mnema::error::Error;
use mnema::memory::types::{Memory, MemoryKind};
use mnema::memory::vector_store::VectorStore;
use mnema::storage::{MemStorage, StoragePort};

fn store_with(embedder: StubEmbedder, storage: Arc<dyn StoragePort>) -> VectorStore {
    VectorStore::open(Box::new(embedder), storage)
}

#[tokio::test]
async fn upsert_then_find_similar_round_trips() {
    let mut manager = manager();
    let memory = add_fact(&mut manager, "Rust favors explicit error handling").await;

    let results = manager
        .find_similar("Rust favors explicit error handling", 1, 0.0)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.id, memory.id);
    assert_eq!(results[0].memory.content, memory.content);
    assert!((results[0].similarity - 1.0).abs() < 1e-5);
    // The store's projection never carries graph data
    assert!(results[0].memory.connections.is_empty());
}

#[tokio::test]
async fn upsert_same_id_replaces_not_duplicates() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let mut store = store_with(StubEmbedder::new(), Arc::clone(&storage));

    let memory = Memory::new(MemoryKind::Fact, "the cache holds warm entries", "test");
    store.upsert(&memory).await.unwrap();
    store.upsert(&memory).await.unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.contains(&memory.id));
}

#[tokio::test]
async fn delete_removes_from_all_subsequent_queries() {
    let mut manager = manager();
    let keep = add_fact(&mut manager, "the scheduler runs every minute").await;
    let gone = add_fact(&mut manager, "the scheduler logs to stderr").await;

    manager.remove(&gone.id).await.unwrap();

    let results = manager
        .find_similar("the scheduler", 10, 0.0)
        .await
        .unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.memory.id.as_str()).collect();
    assert!(ids.contains(&keep.id.as_str()));
    assert!(!ids.contains(&gone.id.as_str()));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let mut store = store_with(StubEmbedder::new(), storage);

    let memory = Memory::new(MemoryKind::Fact, "ephemeral", "test");
    store.upsert(&memory).await.unwrap();

    store.delete(&memory.id).unwrap();
    store.delete(&memory.id).unwrap();
    store.delete("never-existed").unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn clear_empties_the_collection() {
    let mut manager = manager();
    add_fact(&mut manager, "first").await;
    add_fact(&mut manager, "second").await;

    manager.clear().unwrap();

    assert!(manager.is_empty());
    let results = manager.find_similar("first", 10, 0.0).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn find_similar_filters_below_min_similarity() {
    let embedder = StubEmbedder::new()
        .canned("query", spike(0))
        .canned("close match", vec![0.9, 0.44, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
        .canned("distant match", spike(1));
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let mut store = store_with(embedder, storage);

    store
        .upsert(&Memory::new(MemoryKind::Fact, "close match", "test"))
        .await
        .unwrap();
    store
        .upsert(&Memory::new(MemoryKind::Fact, "distant match", "test"))
        .await
        .unwrap();

    let results = store.find_similar("query", 10, 0.3).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.content, "close match");
}

#[tokio::test]
async fn find_similar_ranks_capital_above_landmark() {
    // "capital of France" should pull the capital fact ahead of the landmark
    let embedder = StubEmbedder::new()
        .canned("capital of France", vec![1.0, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
        .canned(
            "Paris is the capital of France",
            vec![1.0, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )
        .canned(
            "The Eiffel Tower is in Paris",
            vec![0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let mut store = store_with(embedder, storage);

    store
        .upsert(&Memory::new(
            MemoryKind::Fact,
            "Paris is the capital of France",
            "test",
        ))
        .await
        .unwrap();
    store
        .upsert(&Memory::new(
            MemoryKind::Fact,
            "The Eiffel Tower is in Paris",
            "test",
        ))
        .await
        .unwrap();

    let results = store.find_similar("capital of France", 5, 0.3).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].memory.content, "Paris is the capital of France");
    assert_eq!(results[1].memory.content, "The Eiffel Tower is in Paris");
    assert!(results[0].similarity > results[1].similarity);
}

#[tokio::test]
async fn equal_scores_keep_insertion_order() {
    let embedder = StubEmbedder::new()
        .canned("query", spike(0))
        .canned("stored first", spike(0))
        .canned("stored second", spike(0));
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let mut store = store_with(embedder, storage);

    store
        .upsert(&Memory::new(MemoryKind::Fact, "stored first", "test"))
        .await
        .unwrap();
    store
        .upsert(&Memory::new(MemoryKind::Fact, "stored second", "test"))
        .await
        .unwrap();

    let results = store.find_similar("query", 10, 0.0).await.unwrap();
    assert_eq!(results[0].memory.content, "stored first");
    assert_eq!(results[1].memory.content, "stored second");
}

#[tokio::test]
async fn find_similar_truncates_to_limit() {
    let mut manager = manager();
    for i in 0..5 {
        add_fact(&mut manager, &format!("note number {i}")).await;
    }

    let results = manager.find_similar("note number", 3, 0.0).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn stale_dimensions_surface_as_dimension_mismatch() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());

    // Store under an 8-dim model
    let mut store = store_with(StubEmbedder::new(), Arc::clone(&storage));
    store
        .upsert(&Memory::new(MemoryKind::Fact, "written at 8 dims", "test"))
        .await
        .unwrap();

    // Reopen under a 4-dim model — the persisted embeddings are now stale
    let store = store_with(StubEmbedder::with_dimensions(4), storage);
    let result = store.find_similar("anything", 5, 0.0).await;

    assert!(matches!(
        result,
        Err(Error::DimensionMismatch {
            expected: 4,
            actual: 8
        })
    ));
}

#[tokio::test]
async fn embedding_failure_aborts_upsert_without_partial_state() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());

    let mut store = store_with(StubEmbedder::new(), Arc::clone(&storage));
    let existing = Memory::new(MemoryKind::Fact, "already stored", "test");
    store.upsert(&existing).await.unwrap();

    // A provider outage must not disturb what is already there
    let mut store = VectorStore::open(Box::new(FailingEmbedder), Arc::clone(&storage));
    let incoming = Memory::new(MemoryKind::Fact, "never makes it", "test");
    let result = store.upsert(&incoming).await;

    assert!(matches!(result, Err(Error::Embedding(_))));
    assert_eq!(store.len(), 1);
    assert!(store.contains(&existing.id));
    assert!(!store.contains(&incoming.id));
}

#[tokio::test]
async fn embedding_failure_surfaces_from_find_similar() {
    let storage: Arc<dyn StoragePort> = Arc::new(MemStorage::new());
    let store = VectorStore::open(Box::new(FailingEmbedder), storage);

    let result = store.find_similar("query", 5, 0.0).await;
    assert!(matches!(result, Err(Error::Embedding(_))));
}

#[tokio::test]
async fn failed_add_leaves_no_memory_or_vector() {
    let storage = Arc::new(MemStorage::new());
    let mut manager =
        helpers::manager_over(Arc::clone(&storage) as Arc<dyn StoragePort>, FailingEmbedder, StubChat::empty());

    let result = manager
        .add(mnema::memory::manager::NewMemory {
            kind: MemoryKind::Fact,
            content: "doomed".to_string(),
            source: "test".to_string(),
            confidence: None,
            metadata: Default::default(),
        })
        .await;

    assert!(matches!(result, Err(Error::Embedding(_))));
    assert!(manager.is_empty());
    // Nothing was persisted under either key
    assert!(storage.load("vectors").unwrap().is_none());
    assert!(storage.load("memories").unwrap().is_none());
}
