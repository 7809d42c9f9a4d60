//! # Gamepad Module
//!
//! This module handles game controller detection, connection, input reading
//! and rumble using the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! A device qualifies as a gamepad when it reports a left stick (`ABS_X`,
//! `ABS_Y`) and a south face button (`BTN_SOUTH`). If a device path is
//! configured only that path is tried; otherwise `/dev/input/event*` is
//! scanned in sorted order and the first gamepad wins.
//!
//! ## Hot-Plug
//!
//! A read error on the event stream is treated as a disconnect. The
//! gamepad then reports [`ControllerEvent::Disconnected`] and, on later
//! calls, waits one reconnect interval and rescans until a controller
//! reappears, at which point it reports [`ControllerEvent::Connected`].

use async_trait::async_trait;
use evdev::{
    AbsoluteAxisType, Device, EventStream, FFEffectData, FFEffectKind, FFEffectType, FFReplay,
    FFTrigger, InputEventKind, Key, Synchronization,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::mapper::EventMapper;
use super::{ControllerEvent, InputSource};
use crate::config::ControllerConfig;
use crate::error::{PtzPadError, Result};

/// Directory scanned for input devices.
const INPUT_DIR: &str = "/dev/input";

/// Game controller handle
///
/// Owns the async event stream of the detected device. The stream is
/// `None` while the controller is disconnected.
pub struct Gamepad {
    stream: Option<EventStream>,
    device_path: String,
    configured_path: Option<PathBuf>,
    mapper: EventMapper,
    reconnect_interval: Duration,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .field("connected", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Detect and open a game controller
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No gamepad found on the system
    /// - `Io`: The device could not be registered with the runtime
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptz_pad::config::ControllerConfig;
    /// use ptz_pad::controller::gamepad::Gamepad;
    ///
    /// # async fn run() -> ptz_pad::error::Result<()> {
    /// let gamepad = Gamepad::open(&ControllerConfig::default())?;
    /// println!("Connected to controller at: {}", gamepad.device_path());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(config: &ControllerConfig) -> Result<Self> {
        let configured_path =
            (!config.device_path.is_empty()).then(|| PathBuf::from(&config.device_path));

        let (device, path) = detect(configured_path.as_deref())?;
        let name = device.name().unwrap_or("unknown").to_string();
        let stream = device.into_event_stream()?;
        info!("Controller initialized: {} ({})", name, path);

        Ok(Self {
            stream: Some(stream),
            device_path: path,
            configured_path,
            mapper: EventMapper::from_config(config),
            reconnect_interval: config.reconnect_interval(),
        })
    }

    /// Path of the device last opened, e.g. `/dev/input/event17`.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Human-readable device name, `None` while disconnected.
    pub fn name(&self) -> Option<&str> {
        self.stream.as_ref().and_then(|stream| stream.device().name())
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn disconnect(&mut self, error: &std::io::Error) {
        warn!("Controller removed ({}): {}", self.device_path, error);
        self.stream = None;
        self.mapper.reset();
    }

    fn try_reconnect(&mut self) -> Vec<ControllerEvent> {
        match detect(self.configured_path.as_deref()) {
            Ok((device, path)) => {
                let name = device.name().unwrap_or("unknown").to_string();
                match device.into_event_stream() {
                    Ok(stream) => {
                        info!("Controller added: {} ({})", name, path);
                        self.stream = Some(stream);
                        self.device_path = path;
                        vec![ControllerEvent::Connected { name }]
                    }
                    Err(e) => {
                        warn!("Could not stream events from {}: {}", path, e);
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                debug!("Reconnect attempt failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl InputSource for Gamepad {
    async fn next_batch(&mut self) -> Result<Vec<ControllerEvent>> {
        if self.stream.is_none() {
            tokio::time::sleep(self.reconnect_interval).await;
            return Ok(self.try_reconnect());
        }

        let mut batch = Vec::new();
        loop {
            let Some(stream) = self.stream.as_mut() else {
                return Ok(batch);
            };

            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    self.disconnect(&e);
                    batch.push(ControllerEvent::Disconnected);
                    return Ok(batch);
                }
            };

            if is_batch_end(event.kind()) {
                return Ok(batch);
            }

            if let Some(mapped) = self.mapper.process_event(&event) {
                batch.push(mapped);
            }
        }
    }

    async fn rumble(&mut self, duration: Duration) -> Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            debug!("Rumble skipped, controller not connected");
            return Ok(());
        };

        let device = stream.device_mut();
        let supported = device
            .supported_ff()
            .map_or(false, |effects| effects.contains(FFEffectType::FF_RUMBLE));
        if !supported {
            debug!("Rumble skipped, controller has no force feedback");
            return Ok(());
        }

        let length = u16::try_from(duration.as_millis()).unwrap_or(u16::MAX);
        let mut effect = device
            .upload_ff_effect(FFEffectData {
                direction: 0,
                trigger: FFTrigger {
                    button: 0,
                    interval: 0,
                },
                replay: FFReplay { length, delay: 0 },
                kind: FFEffectKind::Rumble {
                    strong_magnitude: u16::MAX,
                    weak_magnitude: u16::MAX,
                },
            })
            .map_err(|e| PtzPadError::Controller(format!("Failed to upload rumble effect: {}", e)))?;

        effect
            .play(1)
            .map_err(|e| PtzPadError::Controller(format!("Failed to start rumble: {}", e)))?;
        tokio::time::sleep(duration).await;
        effect
            .stop()
            .map_err(|e| PtzPadError::Controller(format!("Failed to stop rumble: {}", e)))?;

        Ok(())
    }
}

fn is_batch_end(kind: InputEventKind) -> bool {
    matches!(
        kind,
        InputEventKind::Synchronization(sync) if sync == Synchronization::SYN_REPORT
    )
}

/// Whether a device exposes the controls a gamepad needs.
fn is_gamepad(device: &Device) -> bool {
    let has_stick = device.supported_absolute_axes().map_or(false, |axes| {
        axes.contains(AbsoluteAxisType::ABS_X) && axes.contains(AbsoluteAxisType::ABS_Y)
    });
    let has_south = device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));

    has_stick && has_south
}

/// Finds a gamepad, either at the configured path or by scanning.
fn detect(configured: Option<&Path>) -> Result<(Device, String)> {
    if let Some(path) = configured {
        let device = Device::open(path).map_err(|e| {
            PtzPadError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;
        if !is_gamepad(&device) {
            return Err(PtzPadError::Controller(format!(
                "{} is not a gamepad",
                path.display()
            )));
        }
        return Ok((device, path.to_string_lossy().to_string()));
    }

    scan(Path::new(INPUT_DIR))
}

fn scan(input_dir: &Path) -> Result<(Device, String)> {
    if !input_dir.exists() {
        return Err(PtzPadError::ControllerNotFound);
    }

    let mut entries: Vec<_> = std::fs::read_dir(input_dir)
        .map_err(|e| PtzPadError::Controller(format!("Failed to read {}: {}", input_dir.display(), e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PtzPadError::Controller(format!("Failed to read directory entry: {}", e)))?;

    // Sorted for deterministic selection when several controllers are present
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        let is_event_node = path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().starts_with("event"));
        if !is_event_node {
            continue;
        }

        match Device::open(&path) {
            Ok(device) => {
                debug!(
                    "Found input device: {} ({})",
                    path.display(),
                    device.name().unwrap_or("unnamed")
                );

                if is_gamepad(&device) {
                    return Ok((device, path.to_string_lossy().to_string()));
                }
            }
            Err(e) => {
                // Permission denied or other errors - skip device
                debug!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    Err(PtzPadError::ControllerNotFound)
}
