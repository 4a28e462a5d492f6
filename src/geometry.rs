//! Screen-space and normalized gaze coordinate types

use serde::{Deserialize, Serialize};

use crate::config::{ScreenConfig, TelemetryConfig};

/// A point in raw screen-space pixels.
///
/// Exact coordinate comparison is meaningful here: the engine re-reports the
/// same target position bit-for-bit across dwell frames, which is what the
/// calibration sequencer relies on for dedup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Gaze position in the consumer's device-independent frame.
///
/// Nominally [-1,1] on both axes, but values are not clamped: a noisy
/// estimate outside the screen maps outside the range and is forwarded
/// unmodified. The consumer owns clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedGaze {
    pub x: f32,
    pub y: f32,
}

/// Maps screen-space pixels into the [-1,1]×[-1,1] frame.
///
/// Both axes are sign-inverted by default to match the consumer's coordinate
/// handedness: screen origin (top-left) maps to (1,1).
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    width: f32,
    height: f32,
    invert_x: bool,
    invert_y: bool,
}

impl Normalizer {
    pub fn new(screen: &ScreenConfig, telemetry: &TelemetryConfig) -> Self {
        Self {
            width: screen.width as f32,
            height: screen.height as f32,
            invert_x: telemetry.invert_x,
            invert_y: telemetry.invert_y,
        }
    }

    /// Map a screen point into the normalized frame. Pure, no clamping.
    pub fn normalize(&self, p: ScreenPoint) -> NormalizedGaze {
        let mut x = (p.x / self.width) * 2.0 - 1.0;
        let mut y = (p.y / self.height) * 2.0 - 1.0;

        if self.invert_x {
            x = -x;
        }
        if self.invert_y {
            y = -y;
        }

        NormalizedGaze { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_normalizer(width: u32, height: u32) -> Normalizer {
        Normalizer::new(
            &ScreenConfig { width, height },
            &TelemetryConfig::default(),
        )
    }

    #[test]
    fn test_origin_maps_to_one_one() {
        let n = default_normalizer(1920, 1080);
        let g = n.normalize(ScreenPoint::new(0.0, 0.0));
        assert_eq!(g, NormalizedGaze { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_far_corner_maps_to_minus_one() {
        let n = default_normalizer(1920, 1080);
        let g = n.normalize(ScreenPoint::new(1920.0, 1080.0));
        assert_eq!(g, NormalizedGaze { x: -1.0, y: -1.0 });
    }

    #[test]
    fn test_center_maps_to_zero() {
        let n = default_normalizer(800, 600);
        let g = n.normalize(ScreenPoint::new(400.0, 300.0));
        assert!(g.x.abs() < 1e-6);
        assert!(g.y.abs() < 1e-6);
    }

    #[test]
    fn test_known_point() {
        // (100,100) on 800x600: x = -((100/800)*2 - 1) = 0.75,
        // y = -((100/600)*2 - 1) = 2/3
        let n = default_normalizer(800, 600);
        let g = n.normalize(ScreenPoint::new(100.0, 100.0));
        assert!((g.x - 0.75).abs() < 1e-6);
        assert!((g.y - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent_under_identical_input() {
        let n = default_normalizer(800, 600);
        let p = ScreenPoint::new(123.4, 567.8);
        assert_eq!(n.normalize(p), n.normalize(p));
    }

    #[test]
    fn test_out_of_screen_not_clamped() {
        let n = default_normalizer(800, 600);
        let g = n.normalize(ScreenPoint::new(-100.0, 700.0));
        assert!(g.x > 1.0);
        assert!(g.y < -1.0);
    }

    #[test]
    fn test_no_inversion() {
        let n = Normalizer::new(
            &ScreenConfig {
                width: 800,
                height: 600,
            },
            &TelemetryConfig {
                invert_x: false,
                invert_y: false,
                ..TelemetryConfig::default()
            },
        );
        let g = n.normalize(ScreenPoint::new(0.0, 0.0));
        assert_eq!(g, NormalizedGaze { x: -1.0, y: -1.0 });
    }
}
