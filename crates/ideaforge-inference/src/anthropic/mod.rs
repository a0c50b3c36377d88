//! Anthropic Messages API backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use ideaforge_inference::anthropic::{AnthropicBackend, AnthropicConfig};
//! use ideaforge_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = AnthropicBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = AnthropicConfig {
//!         api_key: "sk-ant-...".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = AnthropicBackend::new(config).unwrap();
//!
//!     let text = backend.generate("Say hello").await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{AnthropicBackend, AnthropicConfig};
pub use error::{to_ideaforge_error, AnthropicErrorCode};
pub use types::*;
