//! # Zoom Classifier
//!
//! Maps the zoom axis to zoom in, zoom out or neutral. Pushing the stick
//! forward (negative values) zooms in.

use std::fmt;

use super::direction::AXIS_THRESHOLD;

/// Zoom motion of the camera lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoomState {
    /// Sent to the camera as `zoomadd`.
    ZoomingIn,
    /// Sent to the camera as `zoomdec`.
    ZoomingOut,
    #[default]
    Neutral,
}

impl ZoomState {
    /// Command prefix understood by the camera, `None` for neutral.
    #[must_use]
    pub fn command_name(self) -> Option<&'static str> {
        match self {
            Self::ZoomingIn => Some("zoomadd"),
            Self::ZoomingOut => Some("zoomdec"),
            Self::Neutral => None,
        }
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }
}

impl fmt::Display for ZoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name().unwrap_or("neutral"))
    }
}

/// Classifies the zoom axis.
///
/// # Examples
///
/// ```
/// use ptz_pad::ptz::zoom::{classify_zoom, ZoomState};
///
/// assert_eq!(classify_zoom(-0.5), ZoomState::ZoomingIn);
/// assert_eq!(classify_zoom(0.5), ZoomState::ZoomingOut);
/// assert_eq!(classify_zoom(0.2), ZoomState::Neutral);
/// ```
#[must_use]
pub fn classify_zoom(z: f32) -> ZoomState {
    if z.abs() <= AXIS_THRESHOLD {
        ZoomState::Neutral
    } else if z < 0.0 {
        ZoomState::ZoomingIn
    } else {
        ZoomState::ZoomingOut
    }
}
