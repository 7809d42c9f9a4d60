//! # PTZ Pad
//!
//! Drive a networked PTZ camera with a game controller.
//!
//! This application reads a gamepad via evdev and sends pan/tilt/zoom
//! commands to the camera's HTTP control endpoint.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use ptz_pad::bridge::Bridge;
use ptz_pad::camera::CameraClient;
use ptz_pad::config::Config;
use ptz_pad::controller::gamepad::Gamepad;
use ptz_pad::effects::light::EasyRemoteLight;
use ptz_pad::effects::screenshot::FfmpegGrabber;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for PTZ Pad
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (first argument, `config/default.toml`, or built-in defaults)
///    - Detect the controller; exit if none is connected
///
/// 2. **Main Loop**
///    - Translate controller input into camera commands
///    - Log and pause on per-iteration failures, then resume
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C or the guide button ends the loop with a success status
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/studio.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO ptz_pad: PTZ Pad v0.1.0 starting...
/// INFO ptz_pad::controller::gamepad: Controller initialized: Xbox Wireless Controller (/dev/input/event21)
/// INFO ptz_pad: Sending commands to http://192.168.5.163/ajaxcom
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("PTZ Pad v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(std::env::args().nth(1).map(PathBuf::from))?;

    let gamepad = Gamepad::open(&config.controller).context("No joysticks/controllers found")?;
    let camera = CameraClient::new(&config.camera)?;
    let grabber = FfmpegGrabber::new(&config.stream);
    let light = EasyRemoteLight::new(&config.light)?;

    info!("Sending commands to {}", camera.url());
    info!("Press Ctrl+C or the guide button to exit");

    let mut bridge = Bridge::new(gamepad, camera, grabber, light, &config);
    bridge.run(shutdown_signal()).await?;

    info!("Exiting...");
    Ok(())
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = explicit {
        info!("Loading configuration from {}", path.display());
        return Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
        return Config::load(default_path)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_PATH));
    }

    info!("No configuration file, using built-in defaults");
    Ok(Config::default())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
