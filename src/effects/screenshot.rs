//! # Screenshot Module
//!
//! Grabs one frame from the camera's RTSP stream and writes it as a JPEG
//! named after the current local time:
//!
//! ```text
//! images/screenshot_2024-03-01_14-05-59.jpg
//! ```
//!
//! Decoding is delegated to `ffmpeg`, which is spawned once per capture.
//! A failed capture is reported to the caller and never retried.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::StreamConfig;
use crate::error::{PtzPadError, Result};

/// Filename timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Captures still frames from the video stream
#[async_trait]
pub trait FrameGrabber: Send {
    /// Captures one frame and returns the path of the written image.
    async fn capture(&mut self) -> Result<PathBuf>;
}

/// Builds the output path for a frame taken at `at`.
#[must_use]
pub fn screenshot_path(output_dir: &Path, at: DateTime<Local>) -> PathBuf {
    output_dir.join(format!("screenshot_{}.jpg", at.format(TIMESTAMP_FORMAT)))
}

/// Frame grabber backed by an `ffmpeg` subprocess
#[derive(Debug, Clone)]
pub struct FfmpegGrabber {
    ffmpeg: String,
    rtsp_url: String,
    output_dir: PathBuf,
}

impl FfmpegGrabber {
    #[must_use]
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            rtsp_url: config.rtsp_url.clone(),
            output_dir: PathBuf::from(&config.output_dir),
        }
    }

    /// Arguments for a single-frame grab into `output`.
    fn args(&self, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-rtsp_transport".to_string(),
            "tcp".to_string(),
            "-i".to_string(),
            self.rtsp_url.clone(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl FrameGrabber for FfmpegGrabber {
    async fn capture(&mut self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let output = screenshot_path(&self.output_dir, Local::now());
        debug!("Grabbing frame from {} into {}", self.rtsp_url, output.display());

        let result = Command::new(&self.ffmpeg)
            .args(self.args(&output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| PtzPadError::Capture(format!("Unable to run {}: {}", self.ffmpeg, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PtzPadError::Capture(format!(
                "Unable to read frame from {}: {}",
                self.rtsp_url,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            return Err(PtzPadError::Capture(format!(
                "Unable to open stream {}",
                self.rtsp_url
            )));
        }

        info!("Screenshot saved as {}", output.display());
        Ok(output)
    }
}
