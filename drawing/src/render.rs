//! Deterministic render plan for the board canvas.
//!
//! This module computes *what* to paint, not pixels: a flat list of
//! [`PaintOp`]s in draw order. The output depends only on the
//! concatenation of the two input lists, confirmed strokes first, so the
//! same document always paints the same scene. Eraser strokes punch
//! through whatever is already painted via destructive compositing.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::stroke::{Point, Stroke};

/// Compositing mode for one paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// Normal alpha blending (`source-over`).
    SourceOver,
    /// Destructive erase (`destination-out`).
    DestinationOut,
}

/// One polyline to paint, with its style and compositing mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOp {
    pub path: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub composite: Composite,
}

/// Build the paint list for `confirmed ++ pending`, order preserved.
#[must_use]
pub fn plan(confirmed: &[Stroke], pending: &[Stroke]) -> Vec<PaintOp> {
    confirmed.iter().chain(pending).map(paint_op).collect()
}

fn paint_op(stroke: &Stroke) -> PaintOp {
    let composite = if stroke.is_eraser {
        Composite::DestinationOut
    } else {
        Composite::SourceOver
    };
    PaintOp {
        path: stroke.points.clone(),
        color: stroke.color.clone(),
        width: stroke.width,
        composite,
    }
}
