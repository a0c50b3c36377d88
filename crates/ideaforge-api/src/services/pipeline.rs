//! Note-processing pipeline.
//!
//! Expansion is mandatory; link discovery, persistence and vault mirroring
//! are each optional and best-effort. Once expansion succeeds a note is
//! always returned, with [`ProcessOutcome`] recording how far it got.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tokio::time::{timeout_at, Instant as Deadline};
use tracing::{debug, info, warn};

use ideaforge_core::{defaults, now_utc, ProcessedNote, ResourceLink};
use ideaforge_inference::expand_note;

use super::collaborators::Collaborators;

/// Pipeline timing settings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Overall budget for one `process_note` call.
    pub request_timeout: Duration,
    /// Budget for link discovery, further capped by what remains of the
    /// overall budget.
    pub search_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(defaults::SEARCH_TIMEOUT_SECS),
        }
    }
}

/// Terminal pipeline failures. Anything else degrades instead of failing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("LLM service not configured. Set ANTHROPIC_API_KEY.")]
    ServiceUnavailable,

    /// Upstream error, malformed answer, or the deadline elapsing mid-call.
    #[error("Failed to expand note: {0}")]
    ExpansionFailed(String),
}

/// Result of the persistence stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceStatus {
    Stored,
    Failed,
    Skipped,
}

/// Result of the vault mirroring stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultStatus {
    Synced,
    Failed,
    Skipped,
}

/// Summary of where a processed note ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Stored and mirrored to the vault.
    Complete,
    /// Stored, but not in the vault.
    StoredNotSynced,
    /// Not stored; the returned note is the only copy the store knows of.
    NotStored,
}

/// A processed note plus the status of each best-effort stage.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub note: ProcessedNote,
    pub persistence: PersistenceStatus,
    pub vault: VaultStatus,
}

impl ProcessOutcome {
    pub fn delivery(&self) -> Delivery {
        match (self.persistence, self.vault) {
            (PersistenceStatus::Stored, VaultStatus::Synced) => Delivery::Complete,
            (PersistenceStatus::Stored, _) => Delivery::StoredNotSynced,
            _ => Delivery::NotStored,
        }
    }
}

/// Orchestrates expansion, link discovery, persistence and vault mirroring.
#[derive(Clone)]
pub struct NotePipeline {
    collaborators: Collaborators,
    config: PipelineConfig,
}

impl NotePipeline {
    pub fn new(collaborators: Collaborators, config: PipelineConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one raw note.
    pub async fn process_note(&self, raw_content: &str) -> Result<ProcessOutcome, PipelineError> {
        if raw_content.trim().is_empty() {
            return Err(PipelineError::InvalidInput("Content is required".to_string()));
        }

        let generator = self
            .collaborators
            .generator
            .as_ref()
            .ok_or(PipelineError::ServiceUnavailable)?;

        let start = Instant::now();
        let deadline = Deadline::now() + self.config.request_timeout;

        debug!(
            subsystem = "pipeline",
            op = "expand",
            prompt_len = raw_content.len(),
            model = generator.model_name(),
            "Expanding note"
        );
        let expansion = match timeout_at(deadline, expand_note(generator.as_ref(), raw_content))
            .await
        {
            Ok(Ok(expansion)) => expansion,
            Ok(Err(e)) => {
                warn!(
                    subsystem = "pipeline",
                    op = "expand",
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Note expansion failed"
                );
                return Err(PipelineError::ExpansionFailed(e.to_string()));
            }
            Err(_) => {
                warn!(
                    subsystem = "pipeline",
                    op = "expand",
                    timeout_secs = self.config.request_timeout.as_secs(),
                    "Note expansion timed out"
                );
                return Err(PipelineError::ExpansionFailed(format!(
                    "Note processing timed out after {}s",
                    self.config.request_timeout.as_secs()
                )));
            }
        };

        let links = self.discover_links(&expansion.title, deadline).await;
        let mut note = ProcessedNote::new(raw_content, expansion, links);
        let persistence = self.persist(&mut note, deadline).await;
        let vault = self.mirror(&mut note, persistence, deadline).await;

        let outcome = ProcessOutcome {
            note,
            persistence,
            vault,
        };
        info!(
            subsystem = "pipeline",
            op = "process",
            note_id = %outcome.note.id,
            category = %outcome.note.category,
            result_count = outcome.note.links.len(),
            delivery = ?outcome.delivery(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Note processed"
        );
        Ok(outcome)
    }

    async fn discover_links(&self, title: &str, deadline: Deadline) -> Vec<ResourceLink> {
        let Some(discovery) = self.collaborators.links.as_ref() else {
            return Vec::new();
        };
        if Deadline::now() >= deadline {
            warn!(subsystem = "pipeline", op = "search", "Deadline reached, skipping link discovery");
            return Vec::new();
        }

        let search_deadline = deadline.min(Deadline::now() + self.config.search_timeout);
        match timeout_at(search_deadline, discovery.discover_links(title)).await {
            Ok(Ok(links)) => {
                debug!(
                    subsystem = "pipeline",
                    op = "search",
                    query = %title,
                    result_count = links.len(),
                    "Links attached"
                );
                links
            }
            Ok(Err(e)) => {
                warn!(
                    subsystem = "pipeline",
                    op = "search",
                    query = %title,
                    error = %e,
                    "Link discovery failed, continuing without links"
                );
                Vec::new()
            }
            Err(_) => {
                warn!(
                    subsystem = "pipeline",
                    op = "search",
                    query = %title,
                    "Link discovery timed out, continuing without links"
                );
                Vec::new()
            }
        }
    }

    async fn persist(&self, note: &mut ProcessedNote, deadline: Deadline) -> PersistenceStatus {
        let Some(store) = self.collaborators.store.as_ref() else {
            return PersistenceStatus::Skipped;
        };
        if Deadline::now() >= deadline {
            warn!(
                subsystem = "pipeline",
                op = "persist",
                note_id = %note.id,
                "Deadline reached, skipping persistence"
            );
            return PersistenceStatus::Skipped;
        }

        match store.insert(note).await {
            Ok(()) => {
                debug!(subsystem = "pipeline", op = "persist", note_id = %note.id, "Note stored");
                PersistenceStatus::Stored
            }
            Err(e) => {
                warn!(
                    subsystem = "pipeline",
                    op = "persist",
                    note_id = %note.id,
                    error = %e,
                    "Database save failed, continuing"
                );
                PersistenceStatus::Failed
            }
        }
    }

    async fn mirror(
        &self,
        note: &mut ProcessedNote,
        persistence: PersistenceStatus,
        deadline: Deadline,
    ) -> VaultStatus {
        let Some(vault) = self.collaborators.vault.as_ref() else {
            return VaultStatus::Skipped;
        };
        if Deadline::now() >= deadline {
            warn!(
                subsystem = "pipeline",
                op = "vault",
                note_id = %note.id,
                "Deadline reached, skipping vault write"
            );
            return VaultStatus::Skipped;
        }

        match vault.write_note(note).await {
            Ok(path) => {
                let synced_at = now_utc();
                note.synced_at = Some(synced_at);
                debug!(
                    subsystem = "pipeline",
                    op = "vault",
                    note_id = %note.id,
                    path = %path.display(),
                    "Note written to vault"
                );

                if persistence == PersistenceStatus::Stored {
                    if let Some(store) = self.collaborators.store.as_ref() {
                        if let Err(e) = store.update_synced_at(&note.id, synced_at).await {
                            warn!(
                                subsystem = "pipeline",
                                op = "vault",
                                note_id = %note.id,
                                error = %e,
                                "Failed to record sync time"
                            );
                        }
                    }
                }
                VaultStatus::Synced
            }
            Err(e) => {
                warn!(
                    subsystem = "pipeline",
                    op = "vault",
                    note_id = %note.id,
                    error = %e,
                    "Vault write failed, continuing"
                );
                VaultStatus::Failed
            }
        }
    }
}
