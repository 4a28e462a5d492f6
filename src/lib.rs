//! GazeLink - Gaze calibration and tracking session controller
//!
//! A headless Rust service that:
//! - Sequences a randomized grid of calibration targets
//! - Dedups the engine's per-frame target reports into "point reached" events
//! - Switches one-way from calibrating to tracking
//! - Normalizes screen-space gaze into a [-1,1] device-independent frame
//! - Streams the result to a game engine over best-effort UDP

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::{GazeLinkError, Result};

use tokio::sync::{broadcast, RwLock};

use session::SessionStatus;

/// Application state shared between the session loop and the entry point
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Latest session progress snapshot
    status: RwLock<SessionStatus>,
    /// Shutdown signal
    shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new application state with the given configuration
    pub fn new(config: Config) -> std::sync::Arc<Self> {
        let (shutdown_tx, _) = broadcast::channel(1);

        std::sync::Arc::new(Self {
            config: RwLock::new(config),
            status: RwLock::new(SessionStatus::default()),
            shutdown_tx,
        })
    }

    /// Record the latest session progress
    pub async fn update_status(&self, status: SessionStatus) {
        let mut current = self.status.write().await;
        *current = status;
    }

    /// Get the latest session progress
    pub async fn get_status(&self) -> SessionStatus {
        *self.status.read().await
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
