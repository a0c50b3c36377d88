//! Category HTTP handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use ideaforge_core::CategoryCount;

/// Response for the category listing.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryCount>,
}

/// Note count per category, every category listed, in stable order.
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.notes.category_counts().await,
    })
}
