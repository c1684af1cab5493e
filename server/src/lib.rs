//! HTTP front end: serves the corpus's static assets and a JSON search
//! endpoint over a persisted index artifact.

use std::path::PathBuf;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mdsearch_core::query::{search, SearchResults};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Explicit server configuration, constructed once at startup and passed to
/// the router as state. There is no process-global registry and no shared
/// index cache: every request works from this config alone.
#[derive(Clone)]
pub struct ServerConfig {
    pub index_path: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub fn build_app(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .fallback_service(ServeDir::new(config.static_dir.clone()))
        .with_state(config)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Each request performs its own load-and-score cycle against the artifact,
/// so concurrent queries share nothing. A missing artifact is an empty
/// result; a corrupt one is a 500 for this query only.
async fn search_handler(
    State(config): State<ServerConfig>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, (StatusCode, String)> {
    match search(&config.index_path, &params.q) {
        Ok(results) => Ok(Json(results)),
        Err(err) => {
            tracing::error!(query = %params.q, error = %format!("{err:#}"), "search failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}")))
        }
    }
}
