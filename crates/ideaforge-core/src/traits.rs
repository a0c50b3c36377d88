//! Core traits for idea-forge abstractions.
//!
//! Each external collaborator of the note pipeline sits behind one of these
//! traits so backends can be swapped or mocked, and so an unconfigured
//! collaborator is simply an absent `Arc<dyn Trait>`.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for processed notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note, assigning its id first if it has none.
    async fn insert(&self, note: &mut ProcessedNote) -> Result<()>;

    /// Fetch a note by id. Fails with `Error::NotFound` when absent.
    async fn fetch(&self, id: &str) -> Result<ProcessedNote>;

    /// List notes newest first with optional exact category filter.
    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse>;

    /// Permanently delete a note. Fails with `Error::NotFound` when absent.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Record the time the note was mirrored to the vault.
    async fn update_synced_at(&self, id: &str, synced_at: DateTime<Utc>) -> Result<()>;

    /// Number of notes per stored category name.
    async fn category_counts(&self) -> Result<HashMap<String, i64>>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// LINK DISCOVERY TRAITS
// =============================================================================

/// Finds web resources related to a topic.
#[async_trait]
pub trait LinkDiscovery: Send + Sync {
    /// Return a deduplicated, capped list of links for `topic`.
    async fn discover_links(&self, topic: &str) -> Result<Vec<ResourceLink>>;
}

// =============================================================================
// VAULT TRAITS
// =============================================================================

/// File sink mirroring notes into an external vault.
#[async_trait]
pub trait VaultSink: Send + Sync {
    /// Render and write the note, returning the absolute path written.
    async fn write_note(&self, note: &ProcessedNote) -> Result<PathBuf>;

    /// Remove the note's file; an already-absent file is not an error.
    async fn delete_note(&self, note: &ProcessedNote) -> Result<()>;
}
