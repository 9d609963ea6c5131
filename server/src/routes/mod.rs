//! Router assembly.
//!
//! The JSON API lives under `/api`; the portfolio website is served as
//! static files from the fallback, with `/healthz` for liveness probes.
//! The board and metrics endpoints are open by design: the site has no
//! authentication, so CORS is wide open as well.

pub mod board;
pub mod github;
pub mod metrics;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/board",
            get(board::get_board)
                .post(board::save_strokes)
                .delete(board::clear_board),
        )
        .route("/api/metrics", get(metrics::get_metrics).post(metrics::apply_increments))
        .route("/api/metrics/visit", post(metrics::record_visit))
        .route("/api/github-stats", get(github::github_stats))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Resolve the path to the portfolio website directory.
fn website_dir() -> PathBuf {
    std::env::var("WEBSITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../website"))
}

/// Full application: the JSON API plus the static portfolio site at `/`.
pub fn app(state: AppState) -> Router {
    let website = ServeDir::new(website_dir()).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(website)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
