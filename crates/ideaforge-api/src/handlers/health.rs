//! Health check handler.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};

use crate::AppState;
use ideaforge_core::defaults;

/// Report liveness and which collaborators are configured.
///
/// Always 200; a missing collaborator shows up as `false` under
/// `components`, not as a failure.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": defaults::SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "components": state.collaborators.status(),
    }))
}
