//! # ideaforge-core
//!
//! Core types, traits, and abstractions for the idea-forge note service.
//!
//! This crate provides the data model shared by every other crate (categories,
//! resource links, processed notes), the error type, and the collaborator
//! traits the note pipeline is wired against.
//!
//! ## Logging
//!
//! Every crate logs through `tracing` with the structured fields `subsystem`,
//! `component`, `op`, `note_id` and `duration_ms`, so one note can be
//! followed through the pipeline in aggregated logs.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, best-effort stage skipped or fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
