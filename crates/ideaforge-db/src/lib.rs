//! # ideaforge-db
//!
//! Storage layer for idea-forge.
//!
//! This crate provides:
//! - SQLite connection pool management
//! - The `notes` repository (single table, embedded migrations)
//! - The vault writer that mirrors notes as frontmatter markdown files
//!
//! ## Example
//!
//! ```rust,ignore
//! use ideaforge_db::{Database, NoteRepository, ListNotesRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("./data/ideaforge.db".as_ref()).await?;
//!     db.migrate().await?;
//!
//!     let page = db.notes.list(ListNotesRequest::default()).await?;
//!     println!("{} notes", page.total);
//!     Ok(())
//! }
//! ```
pub mod notes;
pub mod pool;
pub mod vault;

use std::path::Path;

// Re-export core types
pub use ideaforge_core::*;

pub use notes::SqliteNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use vault::{slugify, VaultConfig, VaultWriter};

/// Database handle bundling the pool and the repositories built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Note repository for CRUD operations.
    pub notes: SqliteNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            notes: SqliteNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open the database file at `path`, creating it when missing.
    pub async fn connect(path: &Path) -> Result<Self> {
        let pool = create_pool(path).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}
