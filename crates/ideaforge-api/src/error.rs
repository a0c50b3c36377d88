//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::services::PipelineError;

/// Errors returned by HTTP handlers, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Database(ideaforge_core::Error),
    NotFound(String),
    BadRequest(String),
    /// Request body or query string could not be decoded.
    InvalidBody(String),
    ServiceUnavailable(String),
    ExpansionFailed(String),
}

impl From<ideaforge_core::Error> for ApiError {
    fn from(err: ideaforge_core::Error) -> Self {
        match &err {
            ideaforge_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            ideaforge_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Database(err),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            PipelineError::ServiceUnavailable => ApiError::ServiceUnavailable(err.to_string()),
            PipelineError::ExpansionFailed(detail) => ApiError::ExpansionFailed(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::Database(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": err.to_string() }),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::InvalidBody(details) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Invalid request body", "details": details }),
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::ExpansionFailed(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Failed to expand note", "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(
            ApiError::from(ideaforge_core::Error::NotFound("x".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(ideaforge_core::Error::InvalidInput("x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(ideaforge_core::Error::Internal("x".into())),
            ApiError::Database(_)
        ));
    }

    #[test]
    fn test_pipeline_error_statuses() {
        let cases = [
            (PipelineError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (PipelineError::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                PipelineError::ExpansionFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
