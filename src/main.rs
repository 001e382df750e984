//! Citation preview server.
//!
//! Exposes the citation core over HTTP:
//!
//! - `POST /api/answer/resolve`: parse and resolve an answer's citations (JSON)
//! - `POST /api/answer/render`: the same, rendered as an HTML fragment
//! - `GET /preview`: open a citation deep link at the relocated page
//! - `GET /api/locate`: relocate a snippet's page (JSON)
//! - `/files/{material_id}.pdf`: the material PDFs themselves

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::EnvFilter;

use citelink::{handlers, AppState, Config};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("citelink=info")),
        )
        .init();

    let config = Config::from_env();
    let state = Arc::new(AppState::new(config.clone()));

    let app = Router::new()
        // Answer routes
        .route("/api/answer/resolve", post(handlers::resolve_answer_api))
        .route("/api/answer/render", post(handlers::render_answer_api))
        // Preview routes
        .route("/preview", get(handlers::preview))
        .route("/api/locate", get(handlers::locate_api))
        // Material files
        .nest_service("/files", ServeDir::new(&config.materials_dir))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Citation server running at http://{}", config.bind_addr);
    info!("Materials directory: {}", config.materials_dir.display());

    axum::serve(listener, app).await?;
    Ok(())
}
