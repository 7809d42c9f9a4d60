//! # Error Types
//!
//! Custom error types for PTZ Pad using `thiserror`.

use thiserror::Error;

/// Main error type for PTZ Pad
#[derive(Debug, Error)]
pub enum PtzPadError {
    /// No usable game controller was found during detection
    #[error("No game controller found")]
    ControllerNotFound,

    /// Controller I/O errors (read failures, force feedback upload)
    #[error("Controller error: {0}")]
    Controller(String),

    /// Camera rejected or failed to answer a command
    #[error("Camera error: {0}")]
    Camera(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Frame grab from the video stream failed
    #[error("Capture error: {0}")]
    Capture(String),

    /// Light controller errors
    #[error("Light error: {0}")]
    Light(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PtzPadError {
    /// Whether the event loop must stop instead of backing off and resuming.
    ///
    /// Only startup conditions are fatal. Everything that can happen while the
    /// loop runs is logged, followed by a pause, and the loop resumes.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ControllerNotFound | Self::Config(_))
    }
}

/// Result type alias for PTZ Pad
pub type Result<T> = std::result::Result<T, PtzPadError>;
