//! Gaze engine seam
//!
//! The gaze-estimation engine (face mesh, fixation/saccade classification,
//! calibration-map fitting) is an external collaborator. This module defines
//! the per-frame event types the session consumes and the `GazeEngine`
//! trait; the concrete implementation talks JSON-over-UDP to the tracker
//! helper process.

pub mod bridge;
pub mod subprocess;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::ScreenPoint;
use crate::session::CalibrationPoint;

/// A gaze point the engine judged valid for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeEvent {
    pub point: ScreenPoint,
    /// Rapid eye movement between fixations; display flag only.
    pub saccade: bool,
    /// Label of the regression algorithm that produced the point.
    pub algorithm: String,
}

/// The currently-active on-screen calibration target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEvent {
    pub point: ScreenPoint,
    /// Hit-test radius around the target, in pixels.
    pub acceptance_radius: f32,
}

/// One frame's worth of engine output.
///
/// Both fields absent is the normal "no face or gaze detected this frame"
/// outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub gaze: Option<GazeEvent>,
    pub calibration: Option<CalibrationEvent>,
}

/// Per-frame gaze estimation collaborator.
pub trait GazeEngine {
    /// Upload the session's calibration map. Called once at session start;
    /// the engine is the source of truth for which target is active.
    fn upload_calibration_map(&mut self, points: &[CalibrationPoint], context: &str)
        -> Result<()>;

    /// Set the fixation dwell threshold in seconds.
    fn set_fixation(&mut self, seconds: f32) -> Result<()>;

    /// Advance one frame. `calibrate` tells the engine whether the session
    /// is still collecting calibration targets. `Ok(None)` signals
    /// end-of-stream (camera gone) and must terminate the session loop.
    fn step(
        &mut self,
        calibrate: bool,
        width: u32,
        height: u32,
        context: &str,
    ) -> Result<Option<FrameReport>>;

    /// Label of the algorithm currently driving gaze estimation, if known.
    fn which_algorithm(&self) -> Option<&str>;
}
