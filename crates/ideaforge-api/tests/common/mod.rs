//! Shared fakes for ideaforge-api integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ideaforge_core::{
    Error, LinkDiscovery, LinkType, ListNotesRequest, ListNotesResponse, NoteRepository,
    ProcessedNote, ResourceLink, Result, VaultSink,
};

pub fn link(title: &str, url: &str, link_type: LinkType) -> ResourceLink {
    ResourceLink {
        title: title.to_string(),
        url: url.to_string(),
        link_type,
        description: String::new(),
    }
}

// =============================================================================
// STORES
// =============================================================================

/// Note store backed by a vector.
#[derive(Default)]
pub struct InMemoryStore {
    notes: Mutex<Vec<ProcessedNote>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> Vec<ProcessedNote> {
        self.notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn insert(&self, note: &mut ProcessedNote) -> Result<()> {
        note.ensure_id();
        self.notes.lock().unwrap().push(note.clone());
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<ProcessedNote> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let mut notes: Vec<_> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                req.category
                    .as_deref()
                    .map_or(true, |c| n.category.as_str() == c)
            })
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = notes.len() as i64;
        let notes = notes
            .into_iter()
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .collect();
        Ok(ListNotesResponse { notes, total })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn update_synced_at(&self, id: &str, synced_at: DateTime<Utc>) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))?;
        note.synced_at = Some(synced_at);
        Ok(())
    }

    async fn category_counts(&self) -> Result<HashMap<String, i64>> {
        let mut counts = HashMap::new();
        for note in self.notes.lock().unwrap().iter() {
            *counts.entry(note.category.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

fn locked() -> Error {
    Error::Internal("database is locked".to_string())
}

#[async_trait]
impl NoteRepository for FailingStore {
    async fn insert(&self, _note: &mut ProcessedNote) -> Result<()> {
        Err(locked())
    }

    async fn fetch(&self, _id: &str) -> Result<ProcessedNote> {
        Err(locked())
    }

    async fn list(&self, _req: ListNotesRequest) -> Result<ListNotesResponse> {
        Err(locked())
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(locked())
    }

    async fn update_synced_at(&self, _id: &str, _synced_at: DateTime<Utc>) -> Result<()> {
        Err(locked())
    }

    async fn category_counts(&self) -> Result<HashMap<String, i64>> {
        Err(locked())
    }
}

// =============================================================================
// VAULTS
// =============================================================================

/// Vault that records which notes were written and deleted.
#[derive(Default)]
pub struct RecordingVault {
    pub written: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingVault {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VaultSink for RecordingVault {
    async fn write_note(&self, note: &ProcessedNote) -> Result<PathBuf> {
        self.written.lock().unwrap().push(note.id.clone());
        Ok(PathBuf::from(format!("/vault/IdeaForge/{}.md", note.id)))
    }

    async fn delete_note(&self, note: &ProcessedNote) -> Result<()> {
        self.deleted.lock().unwrap().push(note.id.clone());
        Ok(())
    }
}

/// Vault whose writes and deletes always fail.
pub struct FailingVault;

#[async_trait]
impl VaultSink for FailingVault {
    async fn write_note(&self, _note: &ProcessedNote) -> Result<PathBuf> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only vault",
        )))
    }

    async fn delete_note(&self, _note: &ProcessedNote) -> Result<()> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only vault",
        )))
    }
}

// =============================================================================
// LINK DISCOVERY
// =============================================================================

/// Returns a fixed link list after an optional delay.
pub struct StaticLinks {
    pub links: Vec<ResourceLink>,
    pub delay: Duration,
}

impl StaticLinks {
    pub fn new(links: Vec<ResourceLink>) -> Arc<Self> {
        Arc::new(Self {
            links,
            delay: Duration::ZERO,
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            links: Vec::new(),
            delay,
        })
    }
}

#[async_trait]
impl LinkDiscovery for StaticLinks {
    async fn discover_links(&self, _topic: &str) -> Result<Vec<ResourceLink>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.links.clone())
    }
}

/// Link discovery that always errors.
pub struct FailingLinks;

#[async_trait]
impl LinkDiscovery for FailingLinks {
    async fn discover_links(&self, _topic: &str) -> Result<Vec<ResourceLink>> {
        Err(Error::Search("SearXNG returned 429 Too Many Requests".to_string()))
    }
}
