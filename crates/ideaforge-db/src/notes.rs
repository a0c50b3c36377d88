//! Note repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use ideaforge_core::{
    Category, Error, ListNotesRequest, ListNotesResponse, NoteRepository, ProcessedNote,
    ResourceLink, Result,
};

const NOTE_COLUMNS: &str =
    "id, original, title, category, markdown, links, created_at, synced_at";

/// SQLite implementation of NoteRepository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Encode a timestamp as fixed-width RFC 3339 text so that lexical order in
/// SQLite matches chronological order.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("Invalid timestamp {:?}: {}", raw, e)))
}

fn map_row_to_note(row: &SqliteRow) -> Result<ProcessedNote> {
    let category: String = row.try_get("category")?;
    let links: String = row.try_get("links")?;
    let created_at: String = row.try_get("created_at")?;
    let synced_at: Option<String> = row.try_get("synced_at")?;

    Ok(ProcessedNote {
        id: row.try_get("id")?,
        original: row.try_get("original")?,
        title: row.try_get("title")?,
        category: category.parse::<Category>().map_err(Error::Serialization)?,
        markdown: row.try_get("markdown")?,
        links: serde_json::from_str::<Vec<ResourceLink>>(&links)?,
        created_at: decode_timestamp(&created_at)?,
        synced_at: synced_at.as_deref().map(decode_timestamp).transpose()?,
    })
}

/// Normalize an optional category filter; an empty string means no filter.
fn category_filter(req: &ListNotesRequest) -> Option<&str> {
    req.category.as_deref().filter(|c| !c.is_empty())
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn insert(&self, note: &mut ProcessedNote) -> Result<()> {
        note.ensure_id();
        let links = serde_json::to_string(&note.links)?;

        sqlx::query(
            "INSERT INTO notes (id, original, title, category, markdown, links, created_at, synced_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.original)
        .bind(&note.title)
        .bind(note.category.as_str())
        .bind(&note.markdown)
        .bind(links)
        .bind(encode_timestamp(&note.created_at))
        .bind(note.synced_at.as_ref().map(encode_timestamp))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            note_id = %note.id,
            "Note inserted"
        );
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<ProcessedNote> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))?;

        map_row_to_note(&row)
    }

    async fn list(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let category = category_filter(&req);
        let where_clause = if category.is_some() {
            "WHERE category = ?"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM notes {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(category) = category {
            count_query = count_query.bind(category);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let list_sql = format!(
            "SELECT {} FROM notes {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            NOTE_COLUMNS, where_clause
        );
        let mut list_query = sqlx::query(&list_sql);
        if let Some(category) = category {
            list_query = list_query.bind(category);
        }
        let rows = list_query
            .bind(req.limit)
            .bind(req.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let notes = rows
            .iter()
            .map(map_row_to_note)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListNotesResponse { notes, total })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn update_synced_at(&self, id: &str, synced_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE notes SET synced_at = ? WHERE id = ?")
            .bind(encode_timestamp(&synced_at))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn category_counts(&self) -> Result<HashMap<String, i64>> {
        let rows = sqlx::query("SELECT category, COUNT(*) AS count FROM notes GROUP BY category")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter()
            .map(|row| -> Result<(String, i64)> {
                Ok((row.try_get("category")?, row.try_get("count")?))
            })
            .collect()
    }
}
