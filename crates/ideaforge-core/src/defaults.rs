//! Centralized default constants for idea-forge.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// PIPELINE
// =============================================================================

/// Overall deadline for one note-processing request (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Budget for the link discovery stage (seconds).
pub const SEARCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// INFERENCE
// =============================================================================

/// Anthropic API endpoint.
pub const ANTHROPIC_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default expansion model.
pub const LLM_MODEL: &str = "claude-sonnet-4-20250514";

/// Maximum tokens requested from the model per expansion.
pub const LLM_MAX_TOKENS: u32 = 2048;

/// HTTP timeout for generation requests (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// LINK DISCOVERY
// =============================================================================

/// Maximum number of links attached to a note.
pub const MAX_LINKS: usize = 5;

/// Maximum links taken from a single search query.
pub const LINKS_PER_QUERY: usize = 2;

/// Maximum length of a link description in characters.
pub const LINK_DESCRIPTION_MAX: usize = 150;

/// Search engines requested from SearXNG.
pub const SEARCH_ENGINES: &str = "google,duckduckgo,bing";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for note listing.
pub const PAGE_LIMIT: i64 = 50;

/// Largest accepted page size.
pub const PAGE_LIMIT_MAX: i64 = 500;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// STORAGE
// =============================================================================

/// Default SQLite database file.
pub const DATABASE_PATH: &str = "./data/ideaforge.db";

/// Default folder inside the vault.
pub const VAULT_FOLDER: &str = "IdeaForge";

/// `source` value written into vault frontmatter.
pub const VAULT_SOURCE_TAG: &str = "idea-forge";

/// Maximum slug length in vault filenames.
pub const SLUG_MAX_LEN: usize = 50;

// =============================================================================
// SERVER
// =============================================================================

/// Default listen host.
pub const HOST: &str = "0.0.0.0";

/// Default listen port.
pub const PORT: u16 = 8080;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "idea-forge";

/// Maximum accepted request body in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;
