//! Output module
//!
//! Best-effort UDP outputs of the session:
//! - Telemetry stream of normalized gaze to the game engine consumer
//! - Render intents to the external overlay/preview

pub mod overlay;
pub mod telemetry;

pub use overlay::OverlaySink;
pub use telemetry::TelemetryStreamer;
