#![allow(clippy::float_cmp)]

use super::*;
use crate::history::HISTORY_CAP;

fn dot(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn stroke_of(color: &str) -> Stroke {
    Stroke::begin(dot(0.0, 0.0), color, 6.0, false)
}

/// Draw one complete stroke: down, one move, up.
fn draw_one(session: &mut DrawSession, color: &str) {
    session.begin_stroke(dot(0.0, 0.0), color, 6.0, false);
    session.extend_stroke(dot(5.0, 5.0));
    session.end_stroke();
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn begin_stroke_joins_pending_immediately() {
    let mut session = DrawSession::new();
    session.begin_stroke(dot(1.0, 2.0), "#000000", 6.0, false);
    assert_eq!(session.pending().len(), 1);
    assert_eq!(session.pending()[0].points, vec![dot(1.0, 2.0)]);
}

#[test]
fn extend_stroke_appends_in_place() {
    let mut session = DrawSession::new();
    session.begin_stroke(dot(0.0, 0.0), "#000000", 6.0, false);
    session.extend_stroke(dot(1.0, 0.0));
    session.extend_stroke(dot(2.0, 0.0));
    assert_eq!(session.pending()[0].points.len(), 3);
}

#[test]
fn extend_without_open_stroke_is_noop() {
    let mut session = DrawSession::new();
    session.extend_stroke(dot(1.0, 1.0));
    assert!(session.pending().is_empty());
}

#[test]
fn extend_after_end_is_noop() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#000000");
    session.extend_stroke(dot(99.0, 99.0));
    assert_eq!(session.pending()[0].points.len(), 2);
}

#[test]
fn ended_stroke_stays_pending() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#000000");
    assert_eq!(session.pending().len(), 1);
}

// =============================================================
// save
// =============================================================

#[test]
fn save_with_empty_pending_is_noop() {
    let mut session = DrawSession::new();
    assert!(session.save().is_none());
    assert_eq!(session.history_len(), 0);
}

#[test]
fn save_requests_all_pending_strokes() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#000000");
    draw_one(&mut session, "#ff0000");

    let request = session.save().unwrap();
    assert_eq!(request.new_strokes.len(), 2);
    // Pending is kept until the round-trip is confirmed.
    assert_eq!(session.pending().len(), 2);
    assert_eq!(session.history_len(), 1);
}

#[test]
fn complete_save_adopts_merged_list_and_clears_pending() {
    let mut session = DrawSession::new();
    session.apply_poll(vec![stroke_of("#aaaaaa")]);
    draw_one(&mut session, "#bbbbbb");

    let request = session.save().unwrap();
    let merged = crate::doc::merge_strokes(session.server_strokes().to_vec(), request.new_strokes);
    session.complete_save(merged);

    assert!(session.pending().is_empty());
    assert_eq!(session.server_strokes().len(), 2);
}

#[test]
fn failed_save_keeps_pending_for_the_next_attempt() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#000000");

    let first = session.save().unwrap();
    // Round-trip fails: no complete_save. The next save re-sends.
    let second = session.save().unwrap();
    assert_eq!(first.new_strokes, second.new_strokes);
    assert_eq!(session.pending().len(), 1);
}

// =============================================================
// clear
// =============================================================

#[test]
fn clear_resets_both_slices() {
    let mut session = DrawSession::new();
    session.apply_poll(vec![stroke_of("#aaaaaa"), stroke_of("#bbbbbb")]);
    draw_one(&mut session, "#cccccc");

    session.clear();
    session.complete_clear();

    assert!(session.server_strokes().is_empty());
    assert!(session.pending().is_empty());
}

#[test]
fn clear_snapshots_prior_state() {
    let mut session = DrawSession::new();
    session.apply_poll(vec![stroke_of("#aaaaaa")]);
    draw_one(&mut session, "#bbbbbb");

    session.clear();
    assert_eq!(session.history_len(), 1);
}

// =============================================================
// undo
// =============================================================

#[test]
fn undo_with_pending_pops_only_the_newest() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#111111");
    draw_one(&mut session, "#222222");
    session.clear();
    session.complete_clear();
    draw_one(&mut session, "#333333");
    draw_one(&mut session, "#444444");

    let outcome = session.undo();
    assert_eq!(outcome, UndoOutcome::PoppedPending);
    assert_eq!(session.pending().len(), 1);
    assert_eq!(session.pending()[0].color, "#333333");
    // History untouched while pending absorbs the undo.
    assert_eq!(session.history_len(), 1);
}

#[test]
fn undo_with_empty_pending_restores_newest_snapshot() {
    let mut session = DrawSession::new();
    session.apply_poll(vec![stroke_of("#aaaaaa")]);
    draw_one(&mut session, "#bbbbbb");
    session.clear();
    session.complete_clear();

    let outcome = session.undo();
    let UndoOutcome::Restore(restore) = outcome else {
        panic!("expected a restore, got {outcome:?}");
    };
    assert_eq!(restore.strokes.len(), 1);
    assert_eq!(restore.strokes[0].color, "#aaaaaa");
    assert_eq!(session.server_strokes().len(), 1);
    assert_eq!(session.pending().len(), 1);
    assert_eq!(session.pending()[0].color, "#bbbbbb");
    assert_eq!(session.history_len(), 0);
}

#[test]
fn undo_with_nothing_is_noop() {
    let mut session = DrawSession::new();
    assert_eq!(session.undo(), UndoOutcome::Noop);
}

#[test]
fn undo_mid_draw_pops_the_open_stroke_whole() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#111111");
    session.begin_stroke(dot(0.0, 0.0), "#222222", 6.0, false);

    assert_eq!(session.undo(), UndoOutcome::PoppedPending);
    assert_eq!(session.pending().len(), 1);

    // The open stroke is gone; a stray move must not touch the survivor.
    session.extend_stroke(dot(50.0, 50.0));
    assert_eq!(session.pending()[0].points.len(), 2);
}

#[test]
fn history_is_bounded() {
    let mut session = DrawSession::new();
    for _ in 0..(HISTORY_CAP + 5) {
        draw_one(&mut session, "#000000");
        let request = session.save().unwrap();
        session.complete_save(request.new_strokes);
    }
    assert_eq!(session.history_len(), HISTORY_CAP);
}

// =============================================================
// polling
// =============================================================

#[test]
fn poll_overwrites_confirmed_slice_unconditionally() {
    let mut session = DrawSession::new();
    session.apply_poll(vec![stroke_of("#aaaaaa"), stroke_of("#bbbbbb")]);
    session.apply_poll(vec![stroke_of("#cccccc")]);
    assert_eq!(session.server_strokes().len(), 1);
    assert_eq!(session.server_strokes()[0].color, "#cccccc");
}

#[test]
fn poll_leaves_pending_alone() {
    let mut session = DrawSession::new();
    draw_one(&mut session, "#111111");
    session.apply_poll(vec![stroke_of("#aaaaaa")]);
    assert_eq!(session.pending().len(), 1);
}

// =============================================================
// save request wire shape
// =============================================================

#[test]
fn save_request_serializes_as_new_strokes() {
    let request = SaveRequest { new_strokes: vec![stroke_of("#000000")] };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("newStrokes").is_some());
    assert!(value["newStrokes"].is_array());
}
