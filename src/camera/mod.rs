//! # Camera Module
//!
//! Delivers encoded PTZ commands to the camera's HTTP control endpoint.
//!
//! Commands are fire-and-forget: each one is a single POST, the response
//! body is logged and otherwise ignored, and nothing is retried here.
//! Transport failures propagate to the event loop, which logs them and
//! backs off.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use tracing::debug;

use crate::config::CameraConfig;
use crate::error::{PtzPadError, Result};
use crate::ptz::command::{encode_command, PtzCommand};

/// Receiver of PTZ commands
#[async_trait]
pub trait CommandSink: Send {
    /// Transmits one command.
    async fn send(&mut self, command: &PtzCommand) -> Result<()>;
}

/// Headers the camera's web UI sends with every control request.
fn control_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,de;q=0.8"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers.insert(
        "x-requested-with",
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers
}

/// HTTP client for the camera control endpoint
#[derive(Debug, Clone)]
pub struct CameraClient {
    client: reqwest::Client,
    url: String,
    channel: u8,
}

impl CameraClient {
    /// Creates a client for the configured camera.
    ///
    /// No request is made until the first command is sent.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &CameraConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(control_headers())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.control_url(),
            channel: config.channel,
        })
    }

    /// Endpoint URL, e.g. `http://192.168.5.163/ajaxcom`.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CommandSink for CameraClient {
    async fn send(&mut self, command: &PtzCommand) -> Result<()> {
        let payload = encode_command(command, self.channel);
        debug!("Sending {} to {}", command, self.url);

        let response = self
            .client
            .post(&self.url)
            .form(&payload.form())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Camera replied {}: {}", status, body);

        if !status.is_success() {
            return Err(PtzPadError::Camera(format!(
                "{} answered {} for {}",
                self.url, status, command
            )));
        }

        Ok(())
    }
}
