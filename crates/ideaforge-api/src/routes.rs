//! Router construction.

use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::handlers::{
    create_note, delete_note, get_note, health_check, list_categories, list_notes,
};
use crate::AppState;
use ideaforge_core::defaults;

/// CORS for a single-user service on a private network: any origin is
/// mirrored back, credentials allowed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// Build the application router.
///
/// Every route is served both under `/api` and at the root, so the service
/// works behind proxies that strip the prefix.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", get(get_note).delete(delete_note))
        .route("/categories", get(list_categories));

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_BYTES))
        .with_state(state)
}
