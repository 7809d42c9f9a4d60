//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all, see
//! [`Config::default`]) yields the stock setup: camera at `192.168.5.163`,
//! light controller at `172.19.19.221`, controller auto-detected.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{PtzPadError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Camera control endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default = "default_camera_host")]
    pub host: String,

    #[serde(default = "default_control_path")]
    pub control_path: String,

    #[serde(default)]
    pub channel: u8,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Video stream and screenshot configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    #[serde(default = "default_rtsp_url")]
    pub rtsp_url: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
}

/// Light controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LightConfig {
    #[serde(default = "default_light_host")]
    pub host: String,

    #[serde(default = "default_light_object")]
    pub object: String,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_stick_min")]
    pub stick_min: i32,

    #[serde(default = "default_stick_max")]
    pub stick_max: i32,

    #[serde(default = "default_trigger_min")]
    pub trigger_min: i32,

    #[serde(default = "default_trigger_max")]
    pub trigger_max: i32,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Event loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,

    #[serde(default = "default_haptic_pulse_ms")]
    pub haptic_pulse_ms: u64,
}

// Default value functions
fn default_camera_host() -> String { "192.168.5.163".to_string() }
fn default_control_path() -> String { "/ajaxcom".to_string() }
fn default_request_timeout_ms() -> u64 { 2000 }

fn default_rtsp_url() -> String { "rtsp://192.168.5.163:554/live/av0".to_string() }
fn default_output_dir() -> String { "images".to_string() }
fn default_ffmpeg() -> String { "ffmpeg".to_string() }

fn default_light_host() -> String { "172.19.19.221".to_string() }
fn default_light_object() -> String { "black".to_string() }

fn default_stick_min() -> i32 { -32768 }
fn default_stick_max() -> i32 { 32767 }
fn default_trigger_min() -> i32 { 0 }
fn default_trigger_max() -> i32 { 1023 }
fn default_reconnect_interval_ms() -> u64 { 1000 }

fn default_error_backoff_ms() -> u64 { 1000 }
fn default_haptic_pulse_ms() -> u64 { 150 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            host: default_camera_host(),
            control_path: default_control_path(),
            channel: 0,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            rtsp_url: default_rtsp_url(),
            output_dir: default_output_dir(),
            ffmpeg: default_ffmpeg(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            host: default_light_host(),
            object: default_light_object(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            stick_min: default_stick_min(),
            stick_max: default_stick_max(),
            trigger_min: default_trigger_min(),
            trigger_max: default_trigger_max(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            error_backoff_ms: default_error_backoff_ms(),
            haptic_pulse_ms: default_haptic_pulse_ms(),
        }
    }
}

impl CameraConfig {
    /// Full URL of the command endpoint, e.g. `http://192.168.5.163/ajaxcom`.
    #[must_use]
    pub fn control_url(&self) -> String {
        format!("http://{}{}", self.host, self.control_path)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    #[must_use]
    pub fn haptic_pulse(&self) -> Duration {
        Duration::from_millis(self.haptic_pulse_ms)
    }
}

fn invalid(message: &str) -> PtzPadError {
    PtzPadError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptz_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.camera.host.is_empty() {
            return Err(invalid("camera host cannot be empty"));
        }

        if !self.camera.control_path.starts_with('/') {
            return Err(invalid("camera control_path must start with '/'"));
        }

        if self.camera.request_timeout_ms == 0 || self.camera.request_timeout_ms > 60000 {
            return Err(invalid("request_timeout_ms must be between 1 and 60000"));
        }

        if !self.stream.rtsp_url.starts_with("rtsp://") {
            return Err(invalid("rtsp_url must be an rtsp:// URL"));
        }

        if self.stream.output_dir.is_empty() {
            return Err(invalid("stream output_dir cannot be empty"));
        }

        if self.stream.ffmpeg.is_empty() {
            return Err(invalid("ffmpeg binary cannot be empty"));
        }

        if self.light.host.is_empty() {
            return Err(invalid("light host cannot be empty"));
        }

        if self.light.object.is_empty() {
            return Err(invalid("light object cannot be empty"));
        }

        // Controller device_path can be empty (auto-detect)

        if self.controller.stick_min >= self.controller.stick_max {
            return Err(invalid("stick_min must be less than stick_max"));
        }

        if self.controller.trigger_min >= self.controller.trigger_max {
            return Err(invalid("trigger_min must be less than trigger_max"));
        }

        if self.controller.reconnect_interval_ms == 0 || self.controller.reconnect_interval_ms > 60000 {
            return Err(invalid("reconnect_interval_ms must be between 1 and 60000"));
        }

        if self.runtime.error_backoff_ms == 0 || self.runtime.error_backoff_ms > 60000 {
            return Err(invalid("error_backoff_ms must be between 1 and 60000"));
        }

        if self.runtime.haptic_pulse_ms > 5000 {
            return Err(invalid("haptic_pulse_ms must be at most 5000"));
        }

        Ok(())
    }
}
