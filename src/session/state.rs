//! Session state machine

use serde::Serialize;

use crate::engine::FrameReport;
use crate::geometry::ScreenPoint;
use crate::session::TargetSequencer;

/// Session phase. Transitions one way, Calibrating → Tracking, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Collecting calibration targets
    Calibrating,
    /// Streaming normalized gaze to the consumer
    Tracking,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Calibrating => write!(f, "calibrating"),
            Phase::Tracking => write!(f, "tracking"),
        }
    }
}

/// A drawing instruction for the external overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderIntent {
    /// The active calibration target with its hit radius and progress text.
    CalibrationTarget {
        point: ScreenPoint,
        radius: f32,
        progress: String,
    },
    /// The tracked gaze point, colored by saccade state.
    GazeCursor {
        point: ScreenPoint,
        saccade: bool,
        algorithm: String,
    },
}

/// Result of stepping the session one frame.
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// Drawing instructions for this frame, in draw order.
    pub intents: Vec<RenderIntent>,
    /// Gaze point eligible for normalize-and-send, when tracking.
    pub stream: Option<ScreenPoint>,
    /// True on the single frame where calibration completed.
    pub completed: bool,
}

/// Snapshot of session progress for logs and status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub phase: Phase,
    pub reached: usize,
    pub total: usize,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            phase: Phase::Calibrating,
            reached: 0,
            total: 0,
        }
    }
}

/// The per-frame session controller.
///
/// Owns the phase and the target sequencer for the lifetime of one run.
/// Tolerates indefinite runs of empty frames without state change; absence
/// of events is the expected "no face detected" outcome.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    sequencer: TargetSequencer,
    total_points: usize,
}

impl Session {
    /// Create a session expecting `total_points` distinct calibration
    /// targets before tracking begins.
    pub fn new(total_points: usize) -> Self {
        Self {
            phase: Phase::Calibrating,
            sequencer: TargetSequencer::new(),
            total_points,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The calibrate flag handed to the engine each frame.
    ///
    /// Purely phase-derived: the phase flips on the same call that counts
    /// the final distinct target, so the engine sees the flag true up to and
    /// including the frame announcing that target, and false afterwards.
    pub fn calibrating(&self) -> bool {
        self.phase == Phase::Calibrating
    }

    pub fn reached_count(&self) -> usize {
        self.sequencer.reached_count()
    }

    pub fn total_points(&self) -> usize {
        self.total_points
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            reached: self.sequencer.reached_count(),
            total: self.total_points,
        }
    }

    /// Advance one frame with the engine's report.
    ///
    /// While calibrating, a calibration event feeds the sequencer and emits
    /// a target intent with progress text; observing the final distinct
    /// target flips the phase on this same call. While tracking, a gaze
    /// event is forwarded for streaming and drawn as a cursor. The
    /// transition frame already counts as tracking, so a gaze event arriving
    /// together with the final calibration event is forwarded immediately.
    pub fn step(&mut self, report: FrameReport) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        if self.phase == Phase::Calibrating {
            if let Some(calibration) = &report.calibration {
                if self.sequencer.observe(calibration.point) {
                    tracing::debug!(
                        "Calibration target {}/{} at ({:.0}, {:.0})",
                        self.sequencer.reached_count(),
                        self.total_points,
                        calibration.point.x,
                        calibration.point.y,
                    );
                }

                outcome.intents.push(RenderIntent::CalibrationTarget {
                    point: calibration.point,
                    radius: calibration.acceptance_radius,
                    progress: format!(
                        "{}/{}",
                        self.sequencer.reached_count(),
                        self.total_points
                    ),
                });

                if self.sequencer.reached_count() >= self.total_points {
                    self.phase = Phase::Tracking;
                    outcome.completed = true;
                }
            }
        }

        if self.phase == Phase::Tracking {
            if let Some(gaze) = &report.gaze {
                outcome.stream = Some(gaze.point);
                outcome.intents.push(RenderIntent::GazeCursor {
                    point: gaze.point,
                    saccade: gaze.saccade,
                    algorithm: gaze.algorithm.clone(),
                });
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CalibrationEvent, GazeEvent};

    fn calibration_frame(x: f32, y: f32) -> FrameReport {
        FrameReport {
            gaze: None,
            calibration: Some(CalibrationEvent {
                point: ScreenPoint::new(x, y),
                acceptance_radius: 50.0,
            }),
        }
    }

    fn gaze_frame(x: f32, y: f32) -> FrameReport {
        FrameReport {
            gaze: Some(GazeEvent {
                point: ScreenPoint::new(x, y),
                saccade: false,
                algorithm: "Ridge".to_string(),
            }),
            calibration: None,
        }
    }

    /// Run a session through `n` distinct calibration targets.
    fn calibrated_session(n: usize) -> Session {
        let mut session = Session::new(n);
        for i in 0..n {
            session.step(calibration_frame(i as f32 * 10.0, 0.0));
        }
        assert_eq!(session.phase(), Phase::Tracking);
        session
    }

    #[test]
    fn test_starts_calibrating() {
        let session = Session::new(25);
        assert_eq!(session.phase(), Phase::Calibrating);
        assert!(session.calibrating());
        assert_eq!(session.reached_count(), 0);
    }

    #[test]
    fn test_dwell_frames_do_not_advance_progress() {
        let mut session = Session::new(25);

        for _ in 0..10 {
            session.step(calibration_frame(100.0, 100.0));
        }
        assert_eq!(session.reached_count(), 1);
        assert!(session.calibrating());
    }

    #[test]
    fn test_progress_text_counts_distinct_targets() {
        let mut session = Session::new(25);

        let outcome = session.step(calibration_frame(100.0, 100.0));
        match &outcome.intents[0] {
            RenderIntent::CalibrationTarget { progress, radius, .. } => {
                assert_eq!(progress, "1/25");
                assert_eq!(*radius, 50.0);
            }
            other => panic!("expected calibration target intent, got {:?}", other),
        }

        let outcome = session.step(calibration_frame(100.0, 100.0));
        match &outcome.intents[0] {
            RenderIntent::CalibrationTarget { progress, .. } => assert_eq!(progress, "1/25"),
            other => panic!("expected calibration target intent, got {:?}", other),
        }
    }

    #[test]
    fn test_final_target_flips_phase_on_same_call() {
        let mut session = Session::new(25);

        for i in 0..24 {
            session.step(calibration_frame(i as f32 * 10.0, 0.0));
            assert!(session.calibrating());
        }

        let outcome = session.step(calibration_frame(999.0, 999.0));
        assert!(outcome.completed);
        assert_eq!(session.phase(), Phase::Tracking);
        assert_eq!(session.reached_count(), 25);
    }

    #[test]
    fn test_transition_happens_exactly_once() {
        let mut session = calibrated_session(3);

        // Further frames never report completion again and never revert
        for i in 0..10 {
            let outcome = session.step(gaze_frame(i as f32, i as f32));
            assert!(!outcome.completed);
            assert_eq!(session.phase(), Phase::Tracking);
        }
    }

    #[test]
    fn test_gaze_on_transition_frame_is_forwarded() {
        let mut session = Session::new(1);

        let report = FrameReport {
            gaze: Some(GazeEvent {
                point: ScreenPoint::new(321.0, 123.0),
                saccade: true,
                algorithm: "Ridge".to_string(),
            }),
            calibration: Some(CalibrationEvent {
                point: ScreenPoint::new(500.0, 500.0),
                acceptance_radius: 40.0,
            }),
        };

        let outcome = session.step(report);
        assert!(outcome.completed);
        assert_eq!(outcome.stream, Some(ScreenPoint::new(321.0, 123.0)));
        assert_eq!(outcome.intents.len(), 2);
        assert!(matches!(
            outcome.intents[0],
            RenderIntent::CalibrationTarget { .. }
        ));
        assert!(matches!(outcome.intents[1], RenderIntent::GazeCursor { .. }));
    }

    #[test]
    fn test_empty_frames_are_not_errors() {
        let mut session = Session::new(2);
        session.step(calibration_frame(100.0, 100.0));

        for _ in 0..1000 {
            let outcome = session.step(FrameReport::default());
            assert!(outcome.intents.is_empty());
            assert!(outcome.stream.is_none());
        }
        assert_eq!(session.reached_count(), 1);
        assert!(session.calibrating());
    }

    #[test]
    fn test_gaze_ignored_while_calibrating() {
        let mut session = Session::new(2);

        let outcome = session.step(gaze_frame(100.0, 100.0));
        assert!(outcome.stream.is_none());
        assert!(outcome.intents.is_empty());
        assert!(session.calibrating());
    }

    #[test]
    fn test_identical_tracking_frames_stream_independently() {
        let mut session = calibrated_session(2);

        // No dedup at the tracking layer: identical points both stream
        let first = session.step(gaze_frame(100.0, 100.0));
        let second = session.step(gaze_frame(100.0, 100.0));
        assert_eq!(first.stream, Some(ScreenPoint::new(100.0, 100.0)));
        assert_eq!(second.stream, Some(ScreenPoint::new(100.0, 100.0)));
    }

    #[test]
    fn test_calibration_event_ignored_while_tracking() {
        let mut session = calibrated_session(2);
        let count = session.reached_count();

        let outcome = session.step(calibration_frame(777.0, 777.0));
        assert!(outcome.intents.is_empty());
        assert_eq!(session.reached_count(), count);
    }

    #[test]
    fn test_cursor_intent_carries_saccade_and_algorithm() {
        let mut session = calibrated_session(1);

        let report = FrameReport {
            gaze: Some(GazeEvent {
                point: ScreenPoint::new(10.0, 20.0),
                saccade: true,
                algorithm: "Fusion".to_string(),
            }),
            calibration: None,
        };

        let outcome = session.step(report);
        match &outcome.intents[0] {
            RenderIntent::GazeCursor {
                saccade, algorithm, ..
            } => {
                assert!(*saccade);
                assert_eq!(algorithm, "Fusion");
            }
            other => panic!("expected gaze cursor intent, got {:?}", other),
        }
    }

    #[test]
    fn test_status_snapshot() {
        let mut session = Session::new(3);
        session.step(calibration_frame(1.0, 1.0));

        let status = session.status();
        assert_eq!(status.phase, Phase::Calibrating);
        assert_eq!(status.reached, 1);
        assert_eq!(status.total, 3);
    }
}
