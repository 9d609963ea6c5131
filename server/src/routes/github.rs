//! GitHub activity route.

use axum::extract::State;
use axum::response::Json;

use crate::services::github::GithubStats;
use crate::state::AppState;

/// `GET /api/github-stats`: cached commit summary. Serves an empty
/// summary when the client is unconfigured or the upstream call fails;
/// the portfolio page renders zeros rather than an error.
pub async fn github_stats(State(state): State<AppState>) -> Json<GithubStats> {
    let Some(client) = &state.github else {
        return Json(GithubStats::default());
    };

    match client.stats().await {
        Ok(stats) => Json(stats),
        Err(e) => {
            tracing::warn!(error = %e, "github stats fetch failed; serving empty summary");
            Json(GithubStats::default())
        }
    }
}
