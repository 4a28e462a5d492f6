//! Calibration target map generation

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CalibrationConfig;

/// A calibration target position in normalized [0,1]×[0,1] grid space.
///
/// Immutable once generated; the engine maps it to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub x: f32,
    pub y: f32,
}

/// The ordered set of calibration targets for one session.
///
/// Generated from a rows×cols grid, shuffled once, then capped at the
/// configured maximum. The order is fixed for the session's lifetime and the
/// map is uploaded to the engine exactly once.
#[derive(Debug, Clone)]
pub struct CalibrationMap {
    points: Vec<CalibrationPoint>,
}

impl CalibrationMap {
    /// Generate a shuffled map from the configured grid.
    pub fn generate(config: &CalibrationConfig) -> Self {
        Self::generate_with(config, &mut rand::thread_rng())
    }

    /// Generate with an explicit RNG (deterministic in tests).
    pub fn generate_with<R: Rng + ?Sized>(config: &CalibrationConfig, rng: &mut R) -> Self {
        let mut points = Vec::with_capacity(config.rows * config.cols);
        for row in 0..config.rows {
            for col in 0..config.cols {
                points.push(CalibrationPoint {
                    x: axis_position(col, config.cols),
                    y: axis_position(row, config.rows),
                });
            }
        }

        points.shuffle(rng);
        points.truncate(config.max_points);

        Self { points }
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Number of targets a user must reach before tracking begins.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Evenly spaced grid coordinate in [0,1]; a single-element axis sits at the
/// screen center.
fn axis_position(index: usize, count: usize) -> f32 {
    if count <= 1 {
        0.5
    } else {
        index as f32 / (count - 1) as f32
    }
}
