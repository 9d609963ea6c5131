use serde_json::json;
use uuid::Uuid;

use super::*;

fn sample_row() -> CounterRow {
    CounterRow {
        id: Uuid::nil(),
        totals: CounterTotals {
            total_visits: 2,
            total_clicks: 30,
            total_mouse_miles: 0.5,
            total_scroll: 400,
        },
    }
}

#[test]
fn counter_row_serializes_flat_in_camel_case() {
    let value = serde_json::to_value(sample_row()).unwrap();
    assert_eq!(value["totalVisits"], 2);
    assert_eq!(value["totalClicks"], 30);
    assert_eq!(value["totalMouseMiles"], 0.5);
    assert_eq!(value["totalScroll"], 400);
    assert!(value.get("totals").is_none());
}

#[test]
fn counter_row_roundtrips_through_the_api_shape() {
    let raw = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "totalVisits": 2,
        "totalClicks": 30,
        "totalMouseMiles": 0.5,
        "totalScroll": 400,
    });
    let row: CounterRow = serde_json::from_value(raw).unwrap();
    assert_eq!(row, sample_row());
}

#[test]
fn created_totals_equal_the_first_delta() {
    // The create path seeds the row with the delta applied to zeros, the
    // same rule the SQL increments follow afterwards.
    let delta = CounterDelta { clicks: 3, mouse_miles: 0.25, scroll: 10 };
    let totals = CounterTotals::default().apply(delta);
    assert_eq!(totals.total_clicks, 3);
    assert_eq!(totals.total_visits, 0);
}

#[test]
fn metrics_error_formats_the_sqlx_cause() {
    let err = MetricsError::from(sqlx::Error::PoolClosed);
    assert!(err.to_string().starts_with("database error:"));
}
