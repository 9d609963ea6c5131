//! Site metrics routes.
//!
//! `GET` is side-effect free and returns `null` before the first write,
//! matching what the metrics section expects while the site is fresh.
//! Increments and visits go through the metrics service so the row is
//! created lazily and only ever moves forward.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use tally::CounterDelta;

use crate::services::metrics::{self, CounterRow};
use crate::state::AppState;

/// `GET /api/metrics`: the counter row, or `null` before first write.
pub async fn get_metrics(
    State(state): State<AppState>,
) -> Result<Json<Option<CounterRow>>, StatusCode> {
    let row = metrics::fetch_counter(&state.pool)
        .await
        .map_err(metrics_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/metrics`: apply batched deltas. Visits never travel this
/// way; the body's absent fields default to zero.
pub async fn apply_increments(
    State(state): State<AppState>,
    Json(delta): Json<CounterDelta>,
) -> Result<Json<CounterRow>, StatusCode> {
    let row = metrics::apply_increments(&state.pool, delta)
        .await
        .map_err(metrics_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/metrics/visit`: count exactly one visit.
pub async fn record_visit(State(state): State<AppState>) -> Result<Json<CounterRow>, StatusCode> {
    let row = metrics::record_visit(&state.pool)
        .await
        .map_err(metrics_error_to_status)?;
    Ok(Json(row))
}

fn metrics_error_to_status(err: metrics::MetricsError) -> StatusCode {
    match err {
        metrics::MetricsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
