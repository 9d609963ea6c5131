//! Board persistence: load, append, clear.
//!
//! DESIGN
//! ======
//! The shared board is one row keyed by a fixed id, holding the full
//! stroke list as JSONB. A save loads the current list, appends the new
//! strokes, and writes the merged list back whole via upsert. This is a
//! read-append-write with no version token: two concurrent savers race
//! and the last full-list write wins. The metrics service is the side of
//! the system built for concurrent writers; this one is not.

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;

use sqlx::PgPool;
use sqlx::types::Json;

use drawing::doc::{BoardDoc, SHARED_BOARD_ID, merge_strokes};
use drawing::stroke::Stroke;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load the shared board, or an empty one before the first write.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn load_board(pool: &PgPool) -> Result<BoardDoc, BoardError> {
    let row = sqlx::query_as::<_, (String, Json<Vec<Stroke>>)>(
        "SELECT id, strokes FROM drawings WHERE id = $1",
    )
    .bind(SHARED_BOARD_ID)
    .fetch_optional(pool)
    .await?;

    Ok(row.map_or_else(BoardDoc::empty, |(id, strokes)| BoardDoc { id, strokes: strokes.0 }))
}

/// Append strokes onto the persisted list and return the merged board.
///
/// # Errors
///
/// Returns a database error if the read or the write fails.
pub async fn append_strokes(pool: &PgPool, new_strokes: Vec<Stroke>) -> Result<BoardDoc, BoardError> {
    let existing = load_board(pool).await?.strokes;
    let merged = merge_strokes(existing, new_strokes);
    write_strokes(pool, merged).await
}

/// Reset the board to an empty stroke list. Idempotent; creates the row
/// if it never existed.
///
/// # Errors
///
/// Returns a database error if the write fails.
pub async fn clear_board(pool: &PgPool) -> Result<BoardDoc, BoardError> {
    write_strokes(pool, Vec::new()).await
}

async fn write_strokes(pool: &PgPool, strokes: Vec<Stroke>) -> Result<BoardDoc, BoardError> {
    sqlx::query(
        "INSERT INTO drawings (id, strokes) VALUES ($1, $2)
         ON CONFLICT (id) DO UPDATE SET strokes = EXCLUDED.strokes",
    )
    .bind(SHARED_BOARD_ID)
    .bind(Json(&strokes))
    .execute(pool)
    .await?;

    Ok(BoardDoc { id: SHARED_BOARD_ID.to_owned(), strokes })
}
