//! Integration tests for the note-processing pipeline and its degradation
//! policy.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    link, FailingLinks, FailingStore, FailingVault, InMemoryStore, RecordingVault, StaticLinks,
};
use ideaforge_api::services::{
    Collaborators, Delivery, NotePipeline, PersistenceStatus, PipelineConfig, PipelineError,
    VaultStatus,
};
use ideaforge_core::{Category, LinkType};
use ideaforge_inference::mock::MockGenerationBackend;

const RAW: &str = "set up home lab with proxmox";

fn generator() -> MockGenerationBackend {
    MockGenerationBackend::new().with_expansion(
        "Set Up Home Lab",
        "homelab",
        "# Set Up Home Lab\n\n- [ ] Install Proxmox",
    )
}

fn pipeline(collaborators: Collaborators) -> NotePipeline {
    NotePipeline::new(collaborators, PipelineConfig::default())
}

#[tokio::test]
async fn test_happy_path_stores_and_mirrors() {
    let store = InMemoryStore::new();
    let vault = RecordingVault::new();
    let links = StaticLinks::new(vec![
        link("proxmox/pve", "https://github.com/proxmox/pve", LinkType::Github),
        link("Proxmox Docs", "https://pve.proxmox.com/docs/", LinkType::Docs),
    ]);
    let backend = generator();

    let outcome = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(backend.clone()))
            .with_links(links)
            .with_store(store.clone())
            .with_vault(vault.clone()),
    )
    .process_note(RAW)
    .await
    .unwrap();

    let note = &outcome.note;
    assert!(note.id.starts_with("note_"));
    assert_eq!(note.id.len(), "note_".len() + 8);
    assert_eq!(note.original, RAW);
    assert_eq!(note.title, "Set Up Home Lab");
    assert_eq!(note.category, Category::Homelab);
    assert_eq!(note.links.len(), 2);
    assert!(note.synced_at.is_some());

    assert_eq!(outcome.persistence, PersistenceStatus::Stored);
    assert_eq!(outcome.vault, VaultStatus::Synced);
    assert_eq!(outcome.delivery(), Delivery::Complete);

    // Raw input is passed to the model verbatim.
    let calls = backend.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains(RAW));

    let stored = store.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, note.id);
    assert_eq!(stored[0].synced_at, note.synced_at);
    assert_eq!(vault.written(), vec![note.id.clone()]);
}

#[tokio::test]
async fn test_unknown_category_falls_back_to_personal() {
    let backend = MockGenerationBackend::new().with_expansion("Groceries", "shopping", "- [ ] milk");

    let outcome = pipeline(Collaborators::new().with_generator(Arc::new(backend)))
        .process_note("buy milk")
        .await
        .unwrap();

    assert_eq!(outcome.note.category, Category::Personal);
}

#[tokio::test]
async fn test_search_failure_yields_empty_links() {
    let outcome = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(generator()))
            .with_links(Arc::new(FailingLinks)),
    )
    .process_note(RAW)
    .await
    .unwrap();

    assert!(outcome.note.links.is_empty());
    let json = serde_json::to_value(&outcome.note).unwrap();
    assert_eq!(json["links"], serde_json::json!([]));
}

#[tokio::test]
async fn test_store_failure_still_returns_note() {
    let vault = RecordingVault::new();

    let outcome = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(generator()))
            .with_store(Arc::new(FailingStore))
            .with_vault(vault.clone()),
    )
    .process_note(RAW)
    .await
    .unwrap();

    assert_eq!(outcome.persistence, PersistenceStatus::Failed);
    assert_eq!(outcome.vault, VaultStatus::Synced);
    assert_eq!(outcome.delivery(), Delivery::NotStored);
    assert_eq!(outcome.note.title, "Set Up Home Lab");
    assert_eq!(vault.written().len(), 1);
}

#[tokio::test]
async fn test_vault_failure_leaves_note_stored_unsynced() {
    let store = InMemoryStore::new();

    let outcome = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(generator()))
            .with_store(store.clone())
            .with_vault(Arc::new(FailingVault)),
    )
    .process_note(RAW)
    .await
    .unwrap();

    assert_eq!(outcome.persistence, PersistenceStatus::Stored);
    assert_eq!(outcome.vault, VaultStatus::Failed);
    assert_eq!(outcome.delivery(), Delivery::StoredNotSynced);
    assert!(outcome.note.synced_at.is_none());
    assert!(store.snapshot()[0].synced_at.is_none());
}

#[tokio::test]
async fn test_no_optional_collaborators() {
    let outcome = pipeline(Collaborators::new().with_generator(Arc::new(generator())))
        .process_note(RAW)
        .await
        .unwrap();

    assert_eq!(outcome.persistence, PersistenceStatus::Skipped);
    assert_eq!(outcome.vault, VaultStatus::Skipped);
    assert_eq!(outcome.delivery(), Delivery::NotStored);
    assert!(outcome.note.links.is_empty());
}

#[tokio::test]
async fn test_missing_generator_is_service_unavailable() {
    let store = InMemoryStore::new();

    let err = pipeline(Collaborators::new().with_store(store.clone()))
        .process_note(RAW)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ServiceUnavailable));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_blank_content_rejected_before_generation() {
    let backend = generator();

    let err = pipeline(Collaborators::new().with_generator(Arc::new(backend.clone())))
        .process_note("  \n\t ")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidInput(ref msg) if msg == "Content is required"));
    assert_eq!(backend.generate_call_count(), 0);
}

#[tokio::test]
async fn test_expansion_failure_persists_nothing() {
    let store = InMemoryStore::new();
    let vault = RecordingVault::new();
    let backend = MockGenerationBackend::new().with_fixed_response("I cannot help with that.");

    let err = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(backend))
            .with_store(store.clone())
            .with_vault(vault.clone()),
    )
    .process_note(RAW)
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::ExpansionFailed(_)));
    assert!(store.snapshot().is_empty());
    assert!(vault.written().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_expansion_times_out() {
    let store = InMemoryStore::new();
    let backend = generator().with_latency(Duration::from_secs(61));

    let err = pipeline(
        Collaborators::new()
            .with_generator(Arc::new(backend))
            .with_store(store.clone()),
    )
    .process_note(RAW)
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ExpansionFailed(ref detail)
            if detail == "Note processing timed out after 60s"
    ));
    assert!(store.snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_search_is_abandoned() {
    let store = InMemoryStore::new();
    let config = PipelineConfig {
        request_timeout: Duration::from_secs(60),
        search_timeout: Duration::from_secs(5),
    };

    let outcome = NotePipeline::new(
        Collaborators::new()
            .with_generator(Arc::new(generator()))
            .with_links(StaticLinks::slow(Duration::from_secs(20)))
            .with_store(store.clone()),
        config,
    )
    .process_note(RAW)
    .await
    .unwrap();

    assert!(outcome.note.links.is_empty());
    assert_eq!(outcome.persistence, PersistenceStatus::Stored);
    assert_eq!(store.snapshot().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_deadline_skips_persistence() {
    let store = InMemoryStore::new();
    let vault = RecordingVault::new();
    let config = PipelineConfig {
        request_timeout: Duration::from_secs(10),
        search_timeout: Duration::from_secs(30),
    };

    let outcome = NotePipeline::new(
        Collaborators::new()
            .with_generator(Arc::new(generator()))
            .with_links(StaticLinks::slow(Duration::from_secs(20)))
            .with_store(store.clone())
            .with_vault(vault.clone()),
        config,
    )
    .process_note(RAW)
    .await
    .unwrap();

    assert_eq!(outcome.persistence, PersistenceStatus::Skipped);
    assert_eq!(outcome.vault, VaultStatus::Skipped);
    assert!(store.snapshot().is_empty());
    assert!(vault.written().is_empty());
}
