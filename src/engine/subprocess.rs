//! Tracker helper subprocess manager
//!
//! Launches the camera-owning gaze tracker helper as a child process with
//! automatic cleanup on drop.

use tokio::process::{Child, Command};

use crate::config::TrackerConfig;
use crate::error::{EngineError, Result};

/// Manages the gaze tracker helper subprocess
pub struct TrackerSubprocess {
    child: Option<Child>,
    config: TrackerConfig,
}

impl TrackerSubprocess {
    /// Create a new subprocess manager (does not start the process)
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            child: None,
            config: config.clone(),
        }
    }

    /// Launch the tracker helper.
    ///
    /// Runs: `python3 <script> --ip <listen_address> --report-port <port>
    ///        --control-port <port> --capture <camera_device> --fps <fps>`
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new("python3")
            .arg(&self.config.script)
            .args(["--ip", &self.config.listen_address])
            .args(["--report-port", &self.config.report_port.to_string()])
            .args(["--control-port", &self.config.control_port.to_string()])
            .args(["--capture", &self.config.camera_device.to_string()])
            .args(["--fps", &self.config.capture_fps.to_string()])
            .kill_on_drop(true)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| {
                EngineError::Subprocess(format!(
                    "Failed to launch tracker at '{}': {}",
                    self.config.script, e
                ))
            })?;

        tracing::info!(
            "Tracker subprocess started (pid: {:?}, camera: {}, report port: {})",
            child.id(),
            self.config.camera_device,
            self.config.report_port,
        );

        self.child = Some(child);
        Ok(())
    }

    /// Check if the subprocess is still running (non-blocking)
    pub fn is_running(&mut self) -> bool {
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    tracing::warn!("Tracker subprocess exited with: {}", status);
                    self.child = None;
                    false
                }
                Err(e) => {
                    tracing::error!("Failed to check subprocess status: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    /// Stop the subprocess by killing it
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("Stopping tracker subprocess (pid: {:?})", child.id());
            let _ = child.kill().await;
            let _ = child.wait().await;
        }
    }
}
