//! Configuration parsing and management for GazeLink

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, GazeLinkError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub calibration: CalibrationConfig,
    pub tracker: TrackerConfig,
    pub telemetry: TelemetryConfig,
    pub overlay: OverlayConfig,
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            calibration: CalibrationConfig::default(),
            tracker: TrackerConfig::default(),
            telemetry: TelemetryConfig::default(),
            overlay: OverlayConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GazeLinkError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, GazeLinkError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, GazeLinkError> {
        // Try config paths in order
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GazeLinkError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "screen".to_string(),
                message: "Screen dimensions must be greater than 0".to_string(),
            }
            .into());
        }

        if self.calibration.rows == 0 || self.calibration.cols == 0 {
            return Err(ConfigError::InvalidValue {
                field: "calibration".to_string(),
                message: "Calibration grid must have at least one row and column".to_string(),
            }
            .into());
        }

        if self.calibration.max_points == 0 {
            return Err(ConfigError::InvalidValue {
                field: "calibration.max_points".to_string(),
                message: "At least one calibration point is required".to_string(),
            }
            .into());
        }

        if !(0.1..=10.0).contains(&self.calibration.fixation_secs) {
            return Err(ConfigError::InvalidValue {
                field: "calibration.fixation_secs".to_string(),
                message: "Fixation threshold must be between 0.1 and 10.0 seconds".to_string(),
            }
            .into());
        }

        if self.telemetry.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "telemetry.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        if self.session.target_fps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.target_fps".to_string(),
                message: "Target frame rate must be greater than 0".to_string(),
            }
            .into());
        }

        if self.tracker.auto_launch {
            let path = std::path::Path::new(&self.tracker.script);
            if !path.exists() {
                tracing::warn!(
                    "Tracker auto_launch enabled but helper script not found at: {}",
                    self.tracker.script
                );
            }
        }

        Ok(())
    }
}

/// Screen geometry used for mapping calibration targets and normalizing gaze
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Calibration grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Cap on the number of targets in a session
    pub max_points: usize,
    /// Fixation dwell threshold in seconds before a target counts as hit
    pub fixation_secs: f32,
    /// Engine calibration context identifier
    pub context: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 6,
            max_points: 25,
            fixation_secs: 1.0,
            context: "default".to_string(),
        }
    }
}

/// Gaze tracker helper configuration (subprocess + UDP bridge)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Auto-launch the tracker helper subprocess
    pub auto_launch: bool,
    /// Path to the tracker helper script
    pub script: String,
    /// Listen address for the loopback bridge sockets
    pub listen_address: String,
    /// UDP port the helper sends per-frame reports to
    pub report_port: u16,
    /// UDP port the helper listens on for control messages
    pub control_port: u16,
    /// Camera device index handed to the helper
    pub camera_device: u32,
    /// Camera capture FPS handed to the helper
    pub capture_fps: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            auto_launch: true,
            script: "scripts/gaze_tracker.py".to_string(),
            listen_address: "127.0.0.1".to_string(),
            report_port: 12480,
            control_port: 12481,
            camera_device: 0,
            capture_fps: 60,
        }
    }
}

/// Telemetry output configuration (game engine consumer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Consumer host
    pub host: String,
    /// Consumer UDP port
    pub port: u16,
    /// Invert the X axis of normalized coordinates
    pub invert_x: bool,
    /// Invert the Y axis of normalized coordinates
    pub invert_y: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50666,
            invert_x: true,
            invert_y: true,
        }
    }
}

/// Overlay sink configuration (external preview window)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Enable forwarding of render intents
    pub enabled: bool,
    /// Overlay host
    pub host: String,
    /// Overlay UDP port
    pub port: u16,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 12482,
        }
    }
}

/// Session loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Target loop cadence in frames per second
    pub target_fps: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("gazelink");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/gazelink");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/gazelink");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gazelink");
        }
    }

    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.telemetry.port, 50666);
        assert_eq!(config.calibration.max_points, 25);
        assert_eq!(config.session.target_fps, 60);
        assert!(config.telemetry.invert_x);
        assert!(config.telemetry.invert_y);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [screen]
            width = 2560
            height = 1440

            [calibration]
            rows = 4
            cols = 4
            max_points = 16

            [telemetry]
            port = 50700
            invert_y = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.calibration.rows, 4);
        assert_eq!(config.calibration.max_points, 16);
        assert_eq!(config.telemetry.port, 50700);
        assert!(config.telemetry.invert_x);
        assert!(!config.telemetry.invert_y);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[calibration]\nfixation_secs = 0.5\n").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.calibration.fixation_secs, 0.5);
    }

    #[test]
    fn test_validate_rejects_zero_screen() {
        let mut config = Config::default();
        config.screen.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let mut config = Config::default();
        config.calibration.rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_fixation_out_of_range() {
        let mut config = Config::default();
        config.calibration.fixation_secs = 0.0;
        assert!(config.validate().is_err());

        config.calibration.fixation_secs = 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let mut config = Config::default();
        config.session.target_fps = 0;
        assert!(config.validate().is_err());
    }
}
