use serde_json::json;

use super::*;
use crate::stroke::Point;

fn named_stroke(color: &str) -> Stroke {
    Stroke::begin(Point::new(0.0, 0.0), color, 6.0, false)
}

// =============================================================
// BoardDoc
// =============================================================

#[test]
fn empty_doc_uses_the_shared_key() {
    let doc = BoardDoc::empty();
    assert_eq!(doc.id, SHARED_BOARD_ID);
    assert!(doc.strokes.is_empty());
}

#[test]
fn default_equals_empty() {
    assert_eq!(BoardDoc::default(), BoardDoc::empty());
}

#[test]
fn doc_serde_roundtrip() {
    let doc = BoardDoc {
        id: SHARED_BOARD_ID.to_owned(),
        strokes: vec![named_stroke("#111111"), named_stroke("#222222")],
    };
    let json = serde_json::to_string(&doc).unwrap();
    let back: BoardDoc = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn doc_deserializes_api_shape() {
    let raw = json!({
        "id": "shared-board",
        "strokes": [{ "pts": [{"x": 0.0, "y": 0.0}], "color": "#000000", "width": 6.0 }],
    });
    let doc: BoardDoc = serde_json::from_value(raw).unwrap();
    assert_eq!(doc.strokes.len(), 1);
}

// =============================================================
// merge_strokes
// =============================================================

#[test]
fn merge_appends_incoming_after_existing() {
    let merged = merge_strokes(
        vec![named_stroke("#aaaaaa"), named_stroke("#bbbbbb")],
        vec![named_stroke("#cccccc")],
    );
    let colors: Vec<&str> = merged.iter().map(|s| s.color.as_str()).collect();
    assert_eq!(colors, vec!["#aaaaaa", "#bbbbbb", "#cccccc"]);
}

#[test]
fn merge_onto_empty_is_incoming() {
    let incoming = vec![named_stroke("#cccccc")];
    assert_eq!(merge_strokes(Vec::new(), incoming.clone()), incoming);
}

#[test]
fn merge_of_empty_is_identity() {
    let existing = vec![named_stroke("#aaaaaa")];
    assert_eq!(merge_strokes(existing.clone(), Vec::new()), existing);
}
