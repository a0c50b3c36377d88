//! Note HTTP handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{Delivery, PersistenceStatus, ProcessOutcome, VaultStatus};
use crate::{ApiError, AppState};
use ideaforge_core::{defaults, ListNotesRequest, ListNotesResponse, ProcessedNote};

/// Request body for note creation.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub content: String,
}

/// Where a freshly created note was delivered.
#[derive(Debug, Serialize)]
pub struct DeliveryReport {
    pub status: Delivery,
    pub stored: bool,
    pub synced: bool,
}

/// Response for note creation: the note plus its delivery report.
#[derive(Debug, Serialize)]
pub struct CreateNoteResponse {
    #[serde(flatten)]
    pub note: ProcessedNote,
    pub delivery: DeliveryReport,
}

impl From<ProcessOutcome> for CreateNoteResponse {
    fn from(outcome: ProcessOutcome) -> Self {
        let delivery = DeliveryReport {
            status: outcome.delivery(),
            stored: outcome.persistence == PersistenceStatus::Stored,
            synced: outcome.vault == VaultStatus::Synced,
        };
        Self {
            note: outcome.note,
            delivery,
        }
    }
}

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    /// Exact category filter; empty means all.
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ListNotesQuery> for ListNotesRequest {
    fn from(query: ListNotesQuery) -> Self {
        Self {
            category: query.category.filter(|c| !c.is_empty()),
            limit: query.limit.unwrap_or(defaults::PAGE_LIMIT),
            offset: query.offset.unwrap_or(defaults::PAGE_OFFSET),
        }
    }
}

/// Create a note from raw content.
///
/// # Returns
/// - 200 OK with the processed note and its delivery report
/// - 400 Bad Request for a malformed body or empty content
/// - 503 Service Unavailable if no expansion backend is configured
/// - 500 Internal Server Error if expansion fails or the request deadline
///   elapses during expansion
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<Json<CreateNoteResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let outcome = state.pipeline.process_note(&body.content).await?;
    Ok(Json(outcome.into()))
}

/// List notes, newest first.
///
/// # Query Parameters
/// - `category`: exact category filter (optional)
/// - `limit`: page size, 1..=500 (default 50)
/// - `offset`: rows to skip (default 0)
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<Json<ListNotesResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = state.notes.list(query.into()).await?;
    Ok(Json(page))
}

/// Get a note by id.
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProcessedNote>, ApiError> {
    Ok(Json(state.notes.get(&id).await?))
}

/// Delete a note and, best-effort, its vault file.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notes.delete(&id).await?;
    Ok(Json(serde_json::json!({
        "message": "Note deleted",
        "id": id,
    })))
}
