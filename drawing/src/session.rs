//! Client draw session: pending strokes, sync effects, and undo.
//!
//! DESIGN
//! ======
//! The session keeps two state slices: `server_strokes` (the last known
//! server truth, overwritten wholesale by every poll) and `pending`
//! (local strokes not yet confirmed persisted). Mutating operations
//! return the wire request the caller must send; the session itself never
//! touches the network. Callers report outcomes back via `complete_*`,
//! so a failed request simply leaves the local slices untouched and the
//! strokes are re-sent on the next explicit save.
//!
//! The in-progress stroke lives at the tail of `pending` from the moment
//! the pointer goes down, so it renders without waiting for pointer-up.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::history::{History, Snapshot, SnapshotAction};
use crate::render::{self, PaintOp};
use crate::stroke::{Point, Stroke};

/// Body of `POST /api/board`: strokes to append to the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub new_strokes: Vec<Stroke>,
}

/// Full-list replacement produced by an undo of a persisted action.
///
/// The caller sends this as a clear followed by a re-append when
/// `strokes` is non-empty, or a bare clear when it is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreRequest {
    pub strokes: Vec<Stroke>,
}

/// What a [`DrawSession::undo`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// Nothing to undo.
    Noop,
    /// Popped the newest pending stroke; no network traffic needed.
    PoppedPending,
    /// Popped a history snapshot; the server list must be replaced.
    Restore(RestoreRequest),
}

/// One client's view of the shared board.
#[derive(Debug, Default)]
pub struct DrawSession {
    server_strokes: Vec<Stroke>,
    pending: Vec<Stroke>,
    drawing: bool,
    history: History,
}

impl DrawSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known server truth.
    #[must_use]
    pub fn server_strokes(&self) -> &[Stroke] {
        &self.server_strokes
    }

    /// Local strokes not yet confirmed persisted.
    #[must_use]
    pub fn pending(&self) -> &[Stroke] {
        &self.pending
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // -------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------

    /// Open a new stroke at `origin`. The stroke joins `pending`
    /// immediately so it renders while still being drawn.
    pub fn begin_stroke(&mut self, origin: Point, color: &str, width: f64, is_eraser: bool) {
        self.pending.push(Stroke::begin(origin, color, width, is_eraser));
        self.drawing = true;
    }

    /// Append a point to the stroke in progress. No-op when no stroke is
    /// open.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.pending.last_mut() {
            stroke.points.push(point);
        }
    }

    /// Finalize the stroke in progress. It stays in `pending`.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    // -------------------------------------------------------------
    // Sync protocol
    // -------------------------------------------------------------

    /// Request persisting all pending strokes. Returns `None` (and sends
    /// nothing) when there is nothing pending. The snapshot is recorded
    /// before the mutation, whatever the request's eventual fate.
    pub fn save(&mut self) -> Option<SaveRequest> {
        if self.pending.is_empty() {
            return None;
        }
        self.snapshot(SnapshotAction::Save);
        Some(SaveRequest { new_strokes: self.pending.clone() })
    }

    /// A save round-trip succeeded; `merged` is the server's updated
    /// stroke list, adopted in place of waiting for the next poll.
    pub fn complete_save(&mut self, merged: Vec<Stroke>) {
        self.pending.clear();
        self.drawing = false;
        self.server_strokes = merged;
    }

    /// Request wiping the shared board. The caller sends the delete.
    pub fn clear(&mut self) {
        self.snapshot(SnapshotAction::Clear);
    }

    /// A clear round-trip succeeded: both slices empty, without waiting
    /// for the next poll.
    pub fn complete_clear(&mut self) {
        self.pending.clear();
        self.drawing = false;
        self.server_strokes.clear();
    }

    /// Two-tier undo. A pending stroke is taken back locally; once
    /// pending is exhausted, the newest snapshot is restored and the
    /// server list must be replaced with the snapshot's saved strokes.
    pub fn undo(&mut self) -> UndoOutcome {
        // Undoing mid-draw finalizes first so a later extend cannot land
        // on whatever stroke becomes the new tail.
        self.drawing = false;

        if self.pending.pop().is_some() {
            return UndoOutcome::PoppedPending;
        }

        let Some(snapshot) = self.history.pop() else {
            return UndoOutcome::Noop;
        };
        self.pending = snapshot.pending_strokes;
        self.server_strokes = snapshot.saved_strokes.clone();
        UndoOutcome::Restore(RestoreRequest { strokes: snapshot.saved_strokes })
    }

    /// Adopt a poll result. Poll results overwrite the confirmed slice
    /// unconditionally; pending is untouched.
    pub fn apply_poll(&mut self, strokes: Vec<Stroke>) {
        self.server_strokes = strokes;
    }

    // -------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------

    /// Deterministic paint operations for the current visual state:
    /// confirmed strokes first, pending on top, in order.
    #[must_use]
    pub fn render_plan(&self) -> Vec<PaintOp> {
        render::plan(&self.server_strokes, &self.pending)
    }

    fn snapshot(&mut self, action: SnapshotAction) {
        self.history.push(Snapshot {
            saved_strokes: self.server_strokes.clone(),
            pending_strokes: self.pending.clone(),
            action,
        });
    }
}
