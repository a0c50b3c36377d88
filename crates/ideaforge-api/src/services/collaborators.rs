//! Optional external collaborators shared by the services.

use std::sync::Arc;

use serde::Serialize;

use ideaforge_core::{GenerationBackend, LinkDiscovery, NoteRepository, VaultSink};

/// Handles to the collaborators that were configured at startup.
///
/// Each one is independently optional; an absent handle means the matching
/// pipeline stage is skipped (or, for the generator, that note creation is
/// unavailable).
#[derive(Clone, Default)]
pub struct Collaborators {
    pub generator: Option<Arc<dyn GenerationBackend>>,
    pub links: Option<Arc<dyn LinkDiscovery>>,
    pub store: Option<Arc<dyn NoteRepository>>,
    pub vault: Option<Arc<dyn VaultSink>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(mut self, generator: Arc<dyn GenerationBackend>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_links(mut self, links: Arc<dyn LinkDiscovery>) -> Self {
        self.links = Some(links);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn NoteRepository>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_vault(mut self, vault: Arc<dyn VaultSink>) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Which collaborators are present, as reported by the health endpoint.
    pub fn status(&self) -> ComponentStatus {
        ComponentStatus {
            database: self.store.is_some(),
            llm: self.generator.is_some(),
            search: self.links.is_some(),
            obsidian: self.vault.is_some(),
        }
    }
}

/// Presence flags for each collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub database: bool,
    pub llm: bool,
    pub search: bool,
    pub obsidian: bool,
}
