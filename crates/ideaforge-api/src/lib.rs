//! # ideaforge-api
//!
//! HTTP API server for idea-forge.
//!
//! This crate provides:
//! - The note-processing pipeline and its degradation policy
//! - Note query operations (list, get, delete, category counts)
//! - The axum router serving both under `/api` and at the root

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
