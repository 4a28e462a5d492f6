//! Telemetry streamer for normalized gaze coordinates
//!
//! A pure best-effort sensor stream: one connectionless datagram per
//! eligible frame, payload `"<x>,<y>"` with 4 fractional digits. No
//! acknowledgment, no sequence numbers, no ordering guarantee, no retries;
//! the stream is frame-rate self-healing.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::config::TelemetryConfig;
use crate::error::{Result, OutputError};
use crate::geometry::NormalizedGaze;

/// Fire-and-forget UDP sender for normalized gaze coordinates.
pub struct TelemetryStreamer {
    socket: UdpSocket,
    target: SocketAddr,
}

impl TelemetryStreamer {
    /// Bind an ephemeral non-blocking socket aimed at the consumer.
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let target = addr
            .to_socket_addrs()
            .map_err(|e| OutputError::InvalidTarget(format!("{}: {}", addr, e)))?
            .next()
            .ok_or_else(|| OutputError::InvalidTarget(addr.clone()))?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| OutputError::Bind(e.to_string()))?;

        // The send must never block the frame loop
        socket
            .set_nonblocking(true)
            .map_err(|e| OutputError::Bind(format!("Failed to set non-blocking: {}", e)))?;

        tracing::info!("Telemetry streaming to {}", target);

        Ok(Self { socket, target })
    }

    /// Serialize and send one gaze sample. Transport errors are logged and
    /// discarded; a failed send never interrupts the frame loop and is never
    /// retried.
    pub fn send(&self, gaze: NormalizedGaze) {
        let payload = format!("{:.4},{:.4}", gaze.x, gaze.y);

        if let Err(e) = self.socket.send_to(payload.as_bytes(), self.target) {
            tracing::warn!("Telemetry send to {} failed: {}", self.target, e);
        }
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}
