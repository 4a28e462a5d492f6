//! Error types for GazeLink

use thiserror::Error;

/// Main error type for GazeLink
#[derive(Error, Debug)]
pub enum GazeLinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Gaze engine bridge errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Bridge bind error: {0}")]
    Bind(String),

    #[error("Control send error: {0}")]
    Control(String),

    #[error("Report receive error: {0}")]
    Receive(String),

    #[error("Tracker subprocess error: {0}")]
    Subprocess(String),
}

/// Output sink errors (telemetry streamer, overlay sink)
///
/// Only socket setup is fallible; per-frame sends swallow transport errors
/// (best-effort sensor stream, the next frame supersedes the last).
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to bind output socket: {0}")]
    Bind(String),

    #[error("Invalid output target address: {0}")]
    InvalidTarget(String),
}

/// Result type alias for GazeLink operations
pub type Result<T> = std::result::Result<T, GazeLinkError>;
