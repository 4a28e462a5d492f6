//! JSON-over-UDP bridge to the gaze tracker helper
//!
//! The helper process owns the camera and the gaze-estimation engine. Per
//! frame it sends a report datagram; the session sends control datagrams
//! (calibration map upload, fixation threshold, per-frame step with the
//! calibrate flag). Both directions are loopback, connectionless, and
//! unacknowledged.
//!
//! Report payload:
//!   `{"gaze": {"point": {"x":..,"y":..}, "saccade": bool} | null,
//!     "calibration": {"point": {..}, "acceptance_radius": f32} | null,
//!     "algorithm": "..." | null,
//!     "end_of_stream": bool}`

use serde::{Deserialize, Serialize};
use std::net::UdpSocket;
use std::time::Duration;

use crate::config::TrackerConfig;
use crate::engine::{CalibrationEvent, FrameReport, GazeEngine, GazeEvent};
use crate::error::{EngineError, Result};
use crate::geometry::ScreenPoint;
use crate::session::CalibrationPoint;

/// Control messages sent to the helper.
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum ControlMessage<'a> {
    CalibrationMap {
        points: &'a [CalibrationPoint],
        context: &'a str,
    },
    Fixation {
        seconds: f32,
    },
    Step {
        calibrate: bool,
        width: u32,
        height: u32,
        context: &'a str,
    },
}

/// Gaze payload inside a report; the algorithm label travels at the report
/// level, so the wire shape differs from [`GazeEvent`].
#[derive(Debug, Deserialize)]
struct WireGaze {
    point: ScreenPoint,
    #[serde(default)]
    saccade: bool,
}

/// A single report datagram from the helper.
#[derive(Debug, Deserialize)]
struct WireReport {
    #[serde(default)]
    gaze: Option<WireGaze>,
    #[serde(default)]
    calibration: Option<CalibrationEvent>,
    #[serde(default)]
    algorithm: Option<String>,
    #[serde(default)]
    end_of_stream: bool,
}

/// UDP implementation of the [`GazeEngine`] seam.
pub struct UdpEngineBridge {
    report_socket: UdpSocket,
    control_socket: UdpSocket,
    control_addr: String,
    algorithm: Option<String>,
}

impl UdpEngineBridge {
    /// Bind the bridge sockets. The report socket is non-blocking; a frame
    /// with no pending report is the normal "nothing observed" outcome.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let report_addr = format!("{}:{}", config.listen_address, config.report_port);

        let report_socket = UdpSocket::bind(&report_addr).map_err(|e| {
            EngineError::Bind(format!("Failed to bind to {}: {}", report_addr, e))
        })?;

        report_socket
            .set_nonblocking(true)
            .map_err(|e| EngineError::Bind(format!("Failed to set non-blocking: {}", e)))?;

        report_socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .ok();

        let control_socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| EngineError::Bind(format!("Failed to bind control socket: {}", e)))?;

        control_socket
            .set_nonblocking(true)
            .map_err(|e| EngineError::Bind(format!("Failed to set non-blocking: {}", e)))?;

        let control_addr = format!("{}:{}", config.listen_address, config.control_port);

        tracing::info!(
            "Engine bridge listening on {} (control: {})",
            report_addr,
            control_addr
        );

        Ok(Self {
            report_socket,
            control_socket,
            control_addr,
            algorithm: None,
        })
    }

    fn send_control(&self, msg: &ControlMessage<'_>) -> Result<()> {
        let payload = serde_json::to_vec(msg)
            .map_err(|e| EngineError::Control(format!("Failed to encode: {}", e)))?;

        self.control_socket
            .send_to(&payload, &self.control_addr)
            .map_err(|e| {
                EngineError::Control(format!("Failed to send to {}: {}", self.control_addr, e))
            })?;

        Ok(())
    }

    /// Receive at most one pending report. `None` when no datagram is
    /// waiting this frame.
    fn recv_report(&self) -> Result<Option<WireReport>> {
        let mut buf = [0u8; 65536];

        match self.report_socket.recv(&mut buf) {
            Ok(size) if size > 0 => match serde_json::from_slice(&buf[..size]) {
                Ok(report) => Ok(Some(report)),
                Err(e) => {
                    // Next frame supersedes a malformed one
                    tracing::trace!("Malformed tracker report: {}", e);
                    Ok(None)
                }
            },
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(EngineError::Receive(format!("Receive error: {}", e)).into()),
        }
    }
}

impl GazeEngine for UdpEngineBridge {
    fn upload_calibration_map(
        &mut self,
        points: &[CalibrationPoint],
        context: &str,
    ) -> Result<()> {
        self.send_control(&ControlMessage::CalibrationMap { points, context })?;
        tracing::info!("Uploaded calibration map ({} targets)", points.len());
        Ok(())
    }

    fn set_fixation(&mut self, seconds: f32) -> Result<()> {
        self.send_control(&ControlMessage::Fixation { seconds })
    }

    fn step(
        &mut self,
        calibrate: bool,
        width: u32,
        height: u32,
        context: &str,
    ) -> Result<Option<FrameReport>> {
        // Per-frame step control is best effort like the rest of the wire;
        // the next frame supersedes a lost one.
        if let Err(e) = self.send_control(&ControlMessage::Step {
            calibrate,
            width,
            height,
            context,
        }) {
            tracing::warn!("Step control send failed: {}", e);
        }

        let report = match self.recv_report()? {
            Some(r) => r,
            None => return Ok(Some(FrameReport::default())),
        };

        if report.end_of_stream {
            tracing::info!("Tracker helper signaled end of stream");
            return Ok(None);
        }

        if let Some(algorithm) = report.algorithm {
            self.algorithm = Some(algorithm);
        }

        let gaze = report.gaze.map(|g| GazeEvent {
            point: g.point,
            saccade: g.saccade,
            algorithm: self.algorithm.clone().unwrap_or_default(),
        });

        Ok(Some(FrameReport {
            gaze,
            calibration: report.calibration,
        }))
    }

    fn which_algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }
}
