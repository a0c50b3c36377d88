//! Service layer for business logic.

pub mod collaborators;
pub mod notes;
pub mod pipeline;

pub use collaborators::{Collaborators, ComponentStatus};
pub use notes::{validate_list_request, NoteQueryService};
pub use pipeline::{
    Delivery, NotePipeline, PersistenceStatus, PipelineConfig, PipelineError, ProcessOutcome,
    VaultStatus,
};
