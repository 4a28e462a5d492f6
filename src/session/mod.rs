//! Calibration-and-tracking session controller
//!
//! The session is a one-way finite-state process: it sequences a randomized
//! grid of calibration targets, counts each target exactly once as the
//! engine announces it, then switches permanently to tracking and forwards
//! gaze points for normalization and telemetry.

pub mod map;
pub mod sequencer;
pub mod state;

pub use map::{CalibrationMap, CalibrationPoint};
pub use sequencer::TargetSequencer;
pub use state::{Phase, RenderIntent, Session, SessionStatus, StepOutcome};
