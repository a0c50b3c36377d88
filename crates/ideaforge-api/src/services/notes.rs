//! Read and delete operations on stored notes.

use tracing::{debug, error, warn};

use ideaforge_core::{
    defaults, Category, CategoryCount, Error, ListNotesRequest, ListNotesResponse, ProcessedNote,
    Result,
};

use super::collaborators::Collaborators;

/// Query service over the note store, with vault cleanup on delete.
#[derive(Clone)]
pub struct NoteQueryService {
    collaborators: Collaborators,
}

fn not_found() -> Error {
    Error::NotFound("Note not found".to_string())
}

/// Check paging bounds before touching the store.
pub fn validate_list_request(req: &ListNotesRequest) -> Result<()> {
    if req.limit < 1 {
        return Err(Error::InvalidInput("limit must be >= 1".to_string()));
    }
    if req.limit > defaults::PAGE_LIMIT_MAX {
        return Err(Error::InvalidInput(format!(
            "limit must be <= {}",
            defaults::PAGE_LIMIT_MAX
        )));
    }
    if req.offset < 0 {
        return Err(Error::InvalidInput("offset must be >= 0".to_string()));
    }
    Ok(())
}

impl NoteQueryService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// List notes newest first; an unconfigured store yields an empty page.
    pub async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        validate_list_request(&req)?;

        let Some(store) = self.collaborators.store.as_ref() else {
            return Ok(ListNotesResponse {
                notes: Vec::new(),
                total: 0,
            });
        };

        store.list(req).await.map_err(|e| {
            error!(subsystem = "notes", op = "list", error = %e, "Failed to list notes");
            e
        })
    }

    pub async fn get(&self, id: &str) -> Result<ProcessedNote> {
        let store = self.collaborators.store.as_ref().ok_or_else(not_found)?;
        store.fetch(id).await.map_err(|e| match e {
            Error::NotFound(_) => not_found(),
            other => other,
        })
    }

    /// Delete the stored note, then its vault file on a best-effort basis.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let store = self.collaborators.store.as_ref().ok_or_else(not_found)?;

        // Fetch first: the vault path is derived from the stored note.
        let note = self.get(id).await?;
        store.delete(id).await.map_err(|e| match e {
            Error::NotFound(_) => not_found(),
            other => other,
        })?;
        debug!(subsystem = "notes", op = "delete", note_id = %id, "Note deleted from store");

        if let Some(vault) = self.collaborators.vault.as_ref() {
            if let Err(e) = vault.delete_note(&note).await {
                warn!(
                    subsystem = "notes",
                    op = "delete",
                    note_id = %id,
                    error = %e,
                    "Failed to delete vault file, note removed from store"
                );
            }
        }
        Ok(())
    }

    /// Counts for every category in stable order, zeros included.
    ///
    /// Store errors degrade to all-zero counts.
    pub async fn category_counts(&self) -> Vec<CategoryCount> {
        let counts = match self.collaborators.store.as_ref() {
            Some(store) => store.category_counts().await.unwrap_or_else(|e| {
                warn!(
                    subsystem = "notes",
                    op = "category_counts",
                    error = %e,
                    "Failed to get category counts, reporting zeros"
                );
                Default::default()
            }),
            None => Default::default(),
        };

        Category::ALL
            .iter()
            .map(|category| CategoryCount {
                name: *category,
                count: counts.get(category.as_str()).copied().unwrap_or(0),
            })
            .collect()
    }
}
