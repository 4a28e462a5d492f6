//! Calibration target dedup and progress counting

use crate::geometry::ScreenPoint;

/// Collapses the engine's per-frame target announcements into discrete
/// "point reached" events.
///
/// The engine re-reports the active target on every frame while the user's
/// eye dwells on it; fixation-duration gating lives inside the engine. The
/// sequencer counts each target once, on the first frame it is announced,
/// by exact coordinate comparison against the previously observed point.
#[derive(Debug, Default)]
pub struct TargetSequencer {
    last: Option<ScreenPoint>,
    reached: usize,
}

impl TargetSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a target announcement. Returns true iff this point differs
    /// from the previously observed one; as a side effect the reached
    /// counter is incremented and the point recorded.
    ///
    /// The baseline starts at `None`, so the first announcement always
    /// counts, including a first target at exactly (0,0).
    pub fn observe(&mut self, point: ScreenPoint) -> bool {
        if self.last == Some(point) {
            return false;
        }

        self.last = Some(point);
        self.reached += 1;
        true
    }

    /// Number of distinct targets observed so far. Only ever increases.
    pub fn reached_count(&self) -> usize {
        self.reached
    }

    pub fn last_reported(&self) -> Option<ScreenPoint> {
        self.last
    }
}
