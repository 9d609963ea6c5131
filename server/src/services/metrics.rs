//! Metrics persistence: fetch, increment, visit.
//!
//! The counter is a singleton by convention: the first row found is the
//! counter, and it is created on first write. Updates are field-level
//! SQL increments, so concurrent flushers from different sessions
//! compose instead of overwriting each other.

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use tally::{CounterDelta, CounterTotals};

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The persisted counter row: the totals plus the row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterRow {
    pub id: Uuid,
    #[serde(flatten)]
    pub totals: CounterTotals,
}

type CounterTuple = (Uuid, i64, i64, f64, i64);

fn row_from_tuple((id, total_visits, total_clicks, total_mouse_miles, total_scroll): CounterTuple) -> CounterRow {
    CounterRow {
        id,
        totals: CounterTotals { total_visits, total_clicks, total_mouse_miles, total_scroll },
    }
}

/// Fetch the counter row, `None` before the first write.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn fetch_counter(pool: &PgPool) -> Result<Option<CounterRow>, MetricsError> {
    let row = sqlx::query_as::<_, CounterTuple>(
        "SELECT id, total_visits, total_clicks, total_mouse_miles, total_scroll
         FROM site_metrics LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_from_tuple))
}

/// Apply field-level increments, creating the row if absent.
///
/// # Errors
///
/// Returns a database error if the read or the write fails.
pub async fn apply_increments(pool: &PgPool, delta: CounterDelta) -> Result<CounterRow, MetricsError> {
    let Some(existing) = fetch_counter(pool).await? else {
        return create_counter(pool, CounterTotals::default().apply(delta)).await;
    };

    let row = sqlx::query_as::<_, CounterTuple>(
        "UPDATE site_metrics
         SET total_clicks = total_clicks + $2,
             total_mouse_miles = total_mouse_miles + $3,
             total_scroll = total_scroll + $4
         WHERE id = $1
         RETURNING id, total_visits, total_clicks, total_mouse_miles, total_scroll",
    )
    .bind(existing.id)
    .bind(delta.clicks)
    .bind(delta.mouse_miles)
    .bind(delta.scroll)
    .fetch_one(pool)
    .await?;

    Ok(row_from_tuple(row))
}

/// Increment `total_visits` by exactly one, creating the row if absent.
///
/// # Errors
///
/// Returns a database error if the read or the write fails.
pub async fn record_visit(pool: &PgPool) -> Result<CounterRow, MetricsError> {
    let Some(existing) = fetch_counter(pool).await? else {
        return create_counter(pool, CounterTotals::default().with_visit()).await;
    };

    let row = sqlx::query_as::<_, CounterTuple>(
        "UPDATE site_metrics
         SET total_visits = total_visits + 1
         WHERE id = $1
         RETURNING id, total_visits, total_clicks, total_mouse_miles, total_scroll",
    )
    .bind(existing.id)
    .fetch_one(pool)
    .await?;

    Ok(row_from_tuple(row))
}

async fn create_counter(pool: &PgPool, totals: CounterTotals) -> Result<CounterRow, MetricsError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO site_metrics (id, total_visits, total_clicks, total_mouse_miles, total_scroll)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(totals.total_visits)
    .bind(totals.total_clicks)
    .bind(totals.total_mouse_miles)
    .bind(totals.total_scroll)
    .execute(pool)
    .await?;

    Ok(CounterRow { id, totals })
}
