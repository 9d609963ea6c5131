//! Shared drawing board routes.

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

use drawing::doc::BoardDoc;
use drawing::stroke::Stroke;

use crate::services::board;
use crate::state::AppState;

/// `GET /api/board`: the shared board, empty before the first write.
pub async fn get_board(State(state): State<AppState>) -> Result<Json<BoardDoc>, StatusCode> {
    let doc = board::load_board(&state.pool)
        .await
        .map_err(board_error_to_status)?;
    Ok(Json(doc))
}

/// `POST /api/board`: append the client's pending strokes and return
/// the merged board.
pub async fn save_strokes(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<BoardDoc>, (StatusCode, Json<Value>)> {
    let Some(new_strokes) = parse_new_strokes(&body) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "newStrokes[] required" })),
        ));
    };

    let doc = board::append_strokes(&state.pool, new_strokes)
        .await
        .map_err(|e| {
            (
                board_error_to_status(e),
                Json(serde_json::json!({ "error": "board write failed" })),
            )
        })?;
    Ok(Json(doc))
}

/// `DELETE /api/board`: reset to an empty stroke list. Idempotent.
pub async fn clear_board(State(state): State<AppState>) -> Result<Json<BoardDoc>, StatusCode> {
    let doc = board::clear_board(&state.pool)
        .await
        .map_err(board_error_to_status)?;
    Ok(Json(doc))
}

/// The request contract: `newStrokes` must be an array of strokes.
/// Anything else is the caller's bug, answered with a 400.
fn parse_new_strokes(body: &Value) -> Option<Vec<Stroke>> {
    let raw = body.get("newStrokes")?;
    if !raw.is_array() {
        return None;
    }
    serde_json::from_value(raw.clone()).ok()
}

fn board_error_to_status(err: board::BoardError) -> StatusCode {
    match err {
        board::BoardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
