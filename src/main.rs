//! GazeLink - Gaze calibration and tracking session controller
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gazelink::{
    config::Config,
    engine::{bridge::UdpEngineBridge, subprocess::TrackerSubprocess, GazeEngine},
    geometry::Normalizer,
    output::{OverlaySink, TelemetryStreamer},
    session::{CalibrationMap, Session},
    AppState,
};

/// GazeLink - streams normalized gaze coordinates to a game engine over UDP
#[derive(Parser, Debug)]
#[command(name = "gazelink", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Telemetry port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Disable the overlay intent stream
    #[arg(long)]
    no_overlay: bool,

    /// Do not auto-launch the tracker helper (already running externally)
    #[arg(long)]
    no_launch: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", gazelink::NAME, gazelink::VERSION);

    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.telemetry.port = port;
    }
    if args.no_overlay {
        config.overlay.enabled = false;
    }
    if args.no_launch {
        config.tracker.auto_launch = false;
    }

    config.validate()?;

    info!(
        "Telemetry target: {}:{}",
        config.telemetry.host, config.telemetry.port
    );
    info!(
        "Calibration grid: {}x{} (max {} targets)",
        config.calibration.rows, config.calibration.cols, config.calibration.max_points
    );

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let state = AppState::new(config);

        // Ctrl+C / SIGTERM flips the cooperative termination flag; the loop
        // observes it once per iteration
        let signal_state = Arc::clone(&state);
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            signal_state.shutdown();
        });

        let session_handle = tokio::spawn(run_session(Arc::clone(&state)));

        match session_handle.await {
            Ok(Ok(())) => info!("Session ended"),
            Ok(Err(e)) => error!("Session error: {}", e),
            Err(e) => error!("Session task panicked: {}", e),
        }

        let status = state.get_status().await;
        info!(
            "Final session state: {} ({}/{} targets)",
            status.phase, status.reached, status.total
        );
    });

    info!("GazeLink stopped");
    Ok(())
}

/// The single-session frame loop.
///
/// One iteration = at most one engine step = at most one telemetry send,
/// paced at the configured frame rate. All session state is owned here;
/// sockets and the helper child process are released when the loop returns.
async fn run_session(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await.clone();
    let mut shutdown_rx = state.subscribe_shutdown();

    // Optionally launch the tracker helper
    let mut subprocess = if config.tracker.auto_launch {
        let mut sp = TrackerSubprocess::new(&config.tracker);
        if let Err(e) = sp.start() {
            error!("Failed to auto-launch tracker helper: {}", e);
            // Continue anyway, the user may have it running externally
        }
        // Give the helper a moment to open the camera and start listening
        tokio::time::sleep(Duration::from_secs(2)).await;
        Some(sp)
    } else {
        None
    };

    let mut engine = UdpEngineBridge::new(&config.tracker)?;

    // Upload the shuffled calibration map once; the engine owns which
    // target is active from here on.
    let map = CalibrationMap::generate(&config.calibration);
    engine.upload_calibration_map(map.points(), &config.calibration.context)?;
    engine.set_fixation(config.calibration.fixation_secs)?;

    let mut session = Session::new(map.len());
    let normalizer = Normalizer::new(&config.screen, &config.telemetry);
    let streamer = TelemetryStreamer::new(&config.telemetry)?;
    let overlay = if config.overlay.enabled {
        Some(OverlaySink::new(&config.overlay)?)
    } else {
        None
    };

    info!(
        "Session started: {} calibration targets, {}x{} screen",
        map.len(),
        config.screen.width,
        config.screen.height
    );

    let mut interval =
        tokio::time::interval(Duration::from_secs_f64(1.0 / config.session.target_fps as f64));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = engine.step(
                    session.calibrating(),
                    config.screen.width,
                    config.screen.height,
                    &config.calibration.context,
                )?;

                let report = match report {
                    Some(r) => r,
                    None => {
                        info!("Frame stream ended, stopping session");
                        break;
                    }
                };

                let outcome = session.step(report);

                if outcome.completed {
                    info!(
                        "Calibration complete ({} targets), tracking with {}",
                        session.total_points(),
                        engine.which_algorithm().unwrap_or("unknown algorithm"),
                    );
                }

                if let Some(point) = outcome.stream {
                    streamer.send(normalizer.normalize(point));
                }

                if let Some(ref overlay) = overlay {
                    for intent in &outcome.intents {
                        overlay.send(intent);
                    }
                }

                state.update_status(session.status()).await;

                // A dead helper means no more frames are coming
                if let Some(ref mut sp) = subprocess {
                    if !sp.is_running() {
                        warn!("Tracker helper exited, stopping session");
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Session shutting down");
                break;
            }
        }
    }

    // Cleanup
    if let Some(ref mut sp) = subprocess {
        sp.stop().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
