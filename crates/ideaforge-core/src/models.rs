//! Core data models for idea-forge.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CATEGORIES
// =============================================================================

/// Fixed set of note categories.
///
/// Declaration order is the stable enumeration order used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Homelab,
    Coding,
    Personal,
    Learning,
    Creative,
}

impl Category {
    /// All categories in stable order.
    pub const ALL: [Category; 5] = [
        Category::Homelab,
        Category::Coding,
        Category::Personal,
        Category::Learning,
        Category::Creative,
    ];

    /// Category used when the model answers with something outside the set.
    pub const FALLBACK: Category = Category::Personal;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homelab => "homelab",
            Self::Coding => "coding",
            Self::Personal => "personal",
            Self::Learning => "learning",
            Self::Creative => "creative",
        }
    }

    /// Parse a category, falling back to [`Category::FALLBACK`].
    pub fn coerce(s: &str) -> Self {
        s.parse().unwrap_or(Self::FALLBACK)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "homelab" => Ok(Self::Homelab),
            "coding" => Ok(Self::Coding),
            "personal" => Ok(Self::Personal),
            "learning" => Ok(Self::Learning),
            "creative" => Ok(Self::Creative),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Check whether `s` names one of the fixed categories.
pub fn is_valid_category(s: &str) -> bool {
    s.parse::<Category>().is_ok()
}

/// Names of all categories in stable order.
pub fn valid_categories() -> Vec<&'static str> {
    Category::ALL.iter().map(Category::as_str).collect()
}

/// Note count for a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: Category,
    pub count: i64,
}

// =============================================================================
// RESOURCE LINKS
// =============================================================================

/// Kind of resource a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Github,
    Docs,
    Youtube,
    Article,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Docs => write!(f, "docs"),
            Self::Youtube => write!(f, "youtube"),
            Self::Article => write!(f, "article"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A web resource attached to a note by link discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

// =============================================================================
// NOTES
// =============================================================================

/// Structured result of expanding a raw note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionResult {
    pub title: String,
    pub category: Category,
    pub markdown: String,
}

/// A fully processed note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedNote {
    pub id: String,
    /// Verbatim raw input.
    pub original: String,
    pub title: String,
    pub category: Category,
    pub markdown: String,
    #[serde(default)]
    pub links: Vec<ResourceLink>,
    pub created_at: DateTime<Utc>,
    /// Set only once the note has been mirrored to the vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl ProcessedNote {
    /// Assemble a note from its expansion; assigns the id and creation time.
    pub fn new(
        original: impl Into<String>,
        expansion: ExpansionResult,
        links: Vec<ResourceLink>,
    ) -> Self {
        Self {
            id: new_note_id(),
            original: original.into(),
            title: expansion.title,
            category: expansion.category,
            markdown: expansion.markdown,
            links,
            created_at: now_utc(),
            synced_at: None,
        }
    }

    /// Assign an id if the note does not carry one yet.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.is_empty() {
            self.id = new_note_id();
        }
        &self.id
    }
}

/// Generate a note id: `note_` followed by 8 lowercase hex characters.
pub fn new_note_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("note_{}", &simple[..8])
}

/// Current time truncated to microseconds, the precision the store keeps.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// =============================================================================
// LISTING
// =============================================================================

/// Request for listing notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesRequest {
    /// Exact category filter; `None` lists every category.
    pub category: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListNotesRequest {
    fn default() -> Self {
        Self {
            category: None,
            limit: crate::defaults::PAGE_LIMIT,
            offset: crate::defaults::PAGE_OFFSET,
        }
    }
}

/// Response for listing notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotesResponse {
    pub notes: Vec<ProcessedNote>,
    /// Count of notes matching the filter, independent of limit/offset.
    pub total: i64,
}
