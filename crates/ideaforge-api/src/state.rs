//! Shared application state.

use crate::services::{Collaborators, NotePipeline, NoteQueryService, PipelineConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub collaborators: Collaborators,
    pub pipeline: NotePipeline,
    pub notes: NoteQueryService,
}

impl AppState {
    pub fn new(collaborators: Collaborators, config: PipelineConfig) -> Self {
        Self {
            pipeline: NotePipeline::new(collaborators.clone(), config),
            notes: NoteQueryService::new(collaborators.clone()),
            collaborators,
        }
    }
}
