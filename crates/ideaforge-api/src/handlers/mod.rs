//! HTTP handlers for ideaforge-api.

pub mod categories;
pub mod health;
pub mod notes;

pub use categories::list_categories;
pub use health::health_check;
pub use notes::{create_note, delete_note, get_note, list_notes};
