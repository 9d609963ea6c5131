//! Site metrics batching for the Skysite portfolio.
//!
//! DESIGN
//! ======
//! Interaction counters accumulate in a per-session [`SessionTally`] that
//! is explicitly owned by its driver rather than living in module-level
//! state. A flush drains the tally into a [`CounterDelta`] behind an
//! in-flight gate, so a timer tick racing a shutdown flush cannot send
//! the same deltas twice. Server totals and unflushed session deltas are
//! merged only at display time; the server row itself only ever receives
//! commutative field-level increments, which keeps concurrent flushers
//! from different sessions safe.


use serde::{Deserialize, Serialize};

/// Pixels per mile at the assumed 96 DPI: 96 px/in, 12 in/ft, 5280 ft/mi.
pub const PX_PER_MILE: f64 = 96.0 * 12.0 * 5280.0;

/// Convert a pixel distance to miles.
#[must_use]
pub fn px_to_miles(px: f64) -> f64 {
    px / PX_PER_MILE
}

/// Field-level increments, the body of `POST /api/metrics`.
///
/// Absent fields default to zero so partial bodies stay valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDelta {
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub mouse_miles: f64,
    #[serde(default)]
    pub scroll: i64,
}

impl CounterDelta {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.clicks == 0 && self.mouse_miles == 0.0 && self.scroll == 0
    }
}

/// Running totals of the singleton counter row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterTotals {
    pub total_visits: i64,
    pub total_clicks: i64,
    pub total_mouse_miles: f64,
    pub total_scroll: i64,
}

impl CounterTotals {
    /// Apply increments field by field. Additive and commutative; the
    /// server's SQL update follows the same rule.
    #[must_use]
    pub fn apply(mut self, delta: CounterDelta) -> Self {
        self.total_clicks += delta.clicks;
        self.total_mouse_miles += delta.mouse_miles;
        self.total_scroll += delta.scroll;
        self
    }

    /// Count one visit. Visits arrive on their own endpoint and never
    /// travel in a [`CounterDelta`].
    #[must_use]
    pub fn with_visit(mut self) -> Self {
        self.total_visits += 1;
        self
    }
}

/// Per-session interaction tally with a serialized flush cycle.
#[derive(Debug, Default)]
pub struct SessionTally {
    clicks: i64,
    mouse_px: f64,
    last_pointer: Option<(f64, f64)>,
    in_flight: Option<InFlight>,
}

/// Drained counters riding on an unsettled flush request. Pixel travel
/// stays in pixels so a failed flush restores the tally exactly.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    clicks: i64,
    mouse_px: f64,
}

impl SessionTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicks accumulated since the last successful flush.
    #[must_use]
    pub fn clicks(&self) -> i64 {
        self.clicks
    }

    /// Mouse travel accumulated since the last successful flush, in miles.
    #[must_use]
    pub fn mouse_miles(&self) -> f64 {
        px_to_miles(self.mouse_px)
    }

    pub fn record_click(&mut self) {
        self.clicks += 1;
    }

    /// Accumulate pointer travel. The first observed position yields no
    /// distance; the remembered position updates either way.
    pub fn record_pointer_move(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_pointer {
            self.mouse_px += (x - last_x).hypot(y - last_y);
        }
        self.last_pointer = Some((x, y));
    }

    /// Start a flush: drain the tally into a delta and gate re-entry.
    ///
    /// Returns `None` when there is nothing to send or another flush is
    /// already in flight, so callers skip the network call entirely.
    pub fn begin_flush(&mut self) -> Option<CounterDelta> {
        if self.in_flight.is_some() {
            return None;
        }
        let delta = CounterDelta {
            clicks: self.clicks,
            mouse_miles: px_to_miles(self.mouse_px),
            scroll: 0,
        };
        if delta.is_zero() {
            return None;
        }
        self.in_flight = Some(InFlight { clicks: self.clicks, mouse_px: self.mouse_px });
        self.clicks = 0;
        self.mouse_px = 0.0;
        Some(delta)
    }

    /// The in-flight deltas reached the server.
    pub fn complete_flush(&mut self) {
        self.in_flight = None;
    }

    /// The in-flight request failed: fold its deltas back into the tally
    /// so the next tick re-sends them.
    pub fn fail_flush(&mut self) {
        if let Some(unsent) = self.in_flight.take() {
            self.clicks += unsent.clicks;
            self.mouse_px += unsent.mouse_px;
        }
    }

    /// Optimistic display totals: the last polled server snapshot plus
    /// whatever this session has accumulated and not yet flushed.
    #[must_use]
    pub fn displayed(&self, server: CounterTotals) -> CounterTotals {
        server.apply(CounterDelta {
            clicks: self.clicks,
            mouse_miles: px_to_miles(self.mouse_px),
            scroll: 0,
        })
    }
}
