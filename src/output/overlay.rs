//! Overlay sink for render intents
//!
//! Drawing is owned by the external preview (the tracker helper's window);
//! the session only emits typed intents, forwarded here as JSON datagrams
//! with the same best-effort semantics as telemetry.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::config::OverlayConfig;
use crate::error::{Result, OutputError};
use crate::session::RenderIntent;

/// Fire-and-forget UDP sender for render intents.
pub struct OverlaySink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OverlaySink {
    pub fn new(config: &OverlayConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let target = addr
            .to_socket_addrs()
            .map_err(|e| OutputError::InvalidTarget(format!("{}: {}", addr, e)))?
            .next()
            .ok_or_else(|| OutputError::InvalidTarget(addr.clone()))?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| OutputError::Bind(e.to_string()))?;

        socket
            .set_nonblocking(true)
            .map_err(|e| OutputError::Bind(format!("Failed to set non-blocking: {}", e)))?;

        tracing::info!("Overlay intents streaming to {}", target);

        Ok(Self { socket, target })
    }

    /// Forward one render intent. Errors are logged and discarded.
    pub fn send(&self, intent: &RenderIntent) {
        let payload = match serde_json::to_vec(intent) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Failed to encode render intent: {}", e);
                return;
            }
        };

        if let Err(e) = self.socket.send_to(&payload, self.target) {
            tracing::warn!("Overlay send to {} failed: {}", self.target, e);
        }
    }
}
