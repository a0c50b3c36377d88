//! # ideaforge-search
//!
//! Web link discovery for idea-forge.
//!
//! This crate provides:
//! - A SearXNG client implementing `LinkDiscovery`
//! - URL-based link classification (github, docs, youtube, article)
//! - Description truncation and URL deduplication
//!
//! ## Example
//!
//! ```ignore
//! use ideaforge_search::{LinkDiscovery, SearxngClient};
//!
//! let client = SearxngClient::from_env()?;
//! let links = client.discover_links("Set Up Pi-hole").await?;
//! ```

pub mod classify;
pub mod deduplication;
pub mod searxng;

// Re-export core types
pub use ideaforge_core::*;

pub use classify::{classify_url, truncate_description};
pub use deduplication::dedupe_links;
pub use searxng::{SearxngClient, SearxngConfig};
