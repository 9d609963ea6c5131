//! The shared board document and its merge rule.
//!
//! DESIGN
//! ======
//! There is exactly one board, identified by a fixed key. The persisted
//! stroke list grows append-only: a save appends the client's pending
//! strokes onto whatever the store currently holds, and the merged list is
//! written back whole. Appending via full-list replace means concurrent
//! writers race and the last write wins; the board carries no version
//! token to detect that.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::stroke::Stroke;

/// Fixed key of the single shared board document.
pub const SHARED_BOARD_ID: &str = "shared-board";

/// The board document as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDoc {
    pub id: String,
    pub strokes: Vec<Stroke>,
}

impl BoardDoc {
    /// An empty shared board, the shape served before the first write.
    #[must_use]
    pub fn empty() -> Self {
        Self { id: SHARED_BOARD_ID.to_owned(), strokes: Vec::new() }
    }
}

impl Default for BoardDoc {
    fn default() -> Self {
        Self::empty()
    }
}

/// Append `incoming` onto `existing`, preserving both orders.
///
/// Append order is z-order, so the merged list keeps every existing stroke
/// beneath every incoming one.
#[must_use]
pub fn merge_strokes(existing: Vec<Stroke>, incoming: Vec<Stroke>) -> Vec<Stroke> {
    let mut merged = existing;
    merged.extend(incoming);
    merged
}
