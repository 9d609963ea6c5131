//! Stroke and point types as stored in the document and on the wire.
//!
//! The wire format matches what the board document has always persisted:
//! points travel as `pts`, the eraser flag as `erase`, and the flag is
//! omitted entirely for ordinary strokes. A stroke is immutable once
//! finalized; points are appended only while it is in progress.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

/// A single position in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in pixels.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One continuous pointer-drag drawing action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Ordered point list; append-only while the stroke is in progress.
    #[serde(rename = "pts")]
    pub points: Vec<Point>,
    /// CSS color string.
    pub color: String,
    /// Line width in pixels.
    pub width: f64,
    /// Eraser strokes composite destructively during rendering.
    #[serde(rename = "erase", default, skip_serializing_if = "is_false")]
    pub is_eraser: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Stroke {
    /// Start a new stroke at `origin` with the given style.
    #[must_use]
    pub fn begin(origin: Point, color: &str, width: f64, is_eraser: bool) -> Self {
        Self { points: vec![origin], color: color.to_owned(), width, is_eraser }
    }
}
