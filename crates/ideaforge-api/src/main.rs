//! idea-forge API server.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideaforge_api::{build_router, services::Collaborators, AppState, ServerConfig};
use ideaforge_db::{Database, VaultWriter};
use ideaforge_inference::{AnthropicBackend, GenerationBackend};
use ideaforge_search::SearxngClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "ideaforge_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ideaforge_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("ideaforge-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env();
    let collaborators = init_collaborators(&config).await;
    let status = collaborators.status();
    info!(
        database = status.database,
        llm = status.llm,
        search = status.search,
        obsidian = status.obsidian,
        "Collaborators initialized"
    );

    let state = AppState::new(collaborators, config.pipeline());
    let app = build_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting idea-forge server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build every collaborator that can be configured. A collaborator that
/// fails to initialize is left out and the server runs degraded.
async fn init_collaborators(config: &ServerConfig) -> Collaborators {
    let mut collaborators = Collaborators::new();

    match open_database(config).await {
        Ok(db) => {
            info!(path = %config.database_path.display(), "Database ready");
            collaborators = collaborators.with_store(Arc::new(db.notes));
        }
        Err(e) => warn!(error = %e, "Database unavailable, notes will not be stored"),
    }

    match AnthropicBackend::from_env() {
        Ok(backend) => {
            info!(model = backend.model_name(), "LLM backend ready");
            collaborators = collaborators.with_generator(Arc::new(backend));
        }
        Err(e) => warn!(error = %e, "LLM backend unavailable, note creation disabled"),
    }

    match SearxngClient::from_env() {
        Ok(client) => {
            info!("Link discovery ready");
            collaborators = collaborators.with_links(Arc::new(client));
        }
        Err(e) => warn!(error = %e, "Link discovery unavailable, notes will have no links"),
    }

    match VaultWriter::from_env() {
        Ok(Some(vault)) => {
            info!(root = %vault.root().display(), "Obsidian vault ready");
            collaborators = collaborators.with_vault(Arc::new(vault));
        }
        Ok(None) => info!("OBSIDIAN_VAULT_PATH not set, vault mirroring disabled"),
        Err(e) => warn!(error = %e, "Obsidian vault unavailable, notes will not be mirrored"),
    }

    collaborators
}

async fn open_database(config: &ServerConfig) -> ideaforge_db::Result<Database> {
    let db = Database::connect(&config.database_path).await?;
    db.migrate().await?;
    Ok(db)
}
