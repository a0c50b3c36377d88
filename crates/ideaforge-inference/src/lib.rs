//! # ideaforge-inference
//!
//! LLM note expansion for idea-forge.
//!
//! This crate provides:
//! - Anthropic Messages API backend implementing `GenerationBackend`
//! - The expansion prompt and tolerant parsing of the model's JSON answer
//! - A mock backend for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use ideaforge_inference::{expand_note, AnthropicBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = AnthropicBackend::from_env().unwrap();
//!     let expansion = expand_note(&backend, "set up pihole").await.unwrap();
//!     println!("{} [{}]", expansion.title, expansion.category);
//! }
//! ```

pub mod anthropic;
pub mod expansion;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use ideaforge_core::*;

pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use expansion::{
    clean_json_response, expand_note, parse_expansion_response, EXPANSION_SYSTEM_PROMPT,
};
