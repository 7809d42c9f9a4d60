//! # Directional Classifier
//!
//! Maps the movement stick to one of eight directions or neutral.
//!
//! The circle is split into eight 45° sectors centred on the cardinal and
//! diagonal directions. Sector boundaries sit at odd multiples of 22.5° and
//! every sector includes its lower bound.
//!
//! Direction names follow screen space (positive Y is down), which is what
//! the camera's command set expects:
//!
//! | Angle (degrees) | Direction |
//! |-----------------|-----------|
//! | [22.5, 67.5) | `rightdown` |
//! | [67.5, 112.5) | `down` |
//! | [112.5, 157.5) | `leftdown` |
//! | [157.5, 202.5) | `left` |
//! | [202.5, 247.5) | `leftup` |
//! | [247.5, 292.5) | `up` |
//! | [292.5, 337.5) | `rightup` |
//! | otherwise | `right` |
//!
//! ## Usage
//!
//! ```
//! use ptz_pad::ptz::direction::{classify_direction, Direction};
//!
//! assert_eq!(classify_direction(1.0, 0.0), Direction::Right);
//! assert_eq!(classify_direction(0.0, 1.0), Direction::Down);
//! assert_eq!(classify_direction(0.1, -0.15), Direction::Neutral);
//! ```

use std::fmt;

/// Stick deflection at or below which an axis counts as centred.
pub const AXIS_THRESHOLD: f32 = 0.2;

/// Movement direction of the camera head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Right,
    RightDown,
    Down,
    LeftDown,
    Left,
    LeftUp,
    Up,
    RightUp,
    /// Stick inside the deadzone.
    #[default]
    Neutral,
}

impl Direction {
    /// Command prefix understood by the camera, `None` for neutral.
    #[must_use]
    pub fn command_name(self) -> Option<&'static str> {
        match self {
            Self::Right => Some("right"),
            Self::RightDown => Some("rightdown"),
            Self::Down => Some("down"),
            Self::LeftDown => Some("leftdown"),
            Self::Left => Some("left"),
            Self::LeftUp => Some("leftup"),
            Self::Up => Some("up"),
            Self::RightUp => Some("rightup"),
            Self::Neutral => None,
        }
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name().unwrap_or("neutral"))
    }
}

/// Returns `true` when both stick axes are inside the deadzone.
#[must_use]
pub fn in_deadzone(x: f32, y: f32) -> bool {
    x.abs() <= AXIS_THRESHOLD && y.abs() <= AXIS_THRESHOLD
}

/// Classifies a stick position into a direction.
///
/// # Arguments
///
/// * `x` - Horizontal deflection (-1.0 = left, 1.0 = right)
/// * `y` - Vertical deflection (-1.0 = up, 1.0 = down)
///
/// # Returns
///
/// [`Direction::Neutral`] when both axes are inside the deadzone, otherwise
/// the sector that contains `atan2(y, x)`.
#[must_use]
pub fn classify_direction(x: f32, y: f32) -> Direction {
    if in_deadzone(x, y) {
        return Direction::Neutral;
    }

    let degrees = f64::from(y).atan2(f64::from(x)).to_degrees().rem_euclid(360.0);
    direction_for_angle(degrees)
}

/// Maps an angle in degrees, normalised to `[0, 360)`, to its sector.
#[must_use]
pub fn direction_for_angle(degrees: f64) -> Direction {
    match degrees {
        d if (22.5..67.5).contains(&d) => Direction::RightDown,
        d if (67.5..112.5).contains(&d) => Direction::Down,
        d if (112.5..157.5).contains(&d) => Direction::LeftDown,
        d if (157.5..202.5).contains(&d) => Direction::Left,
        d if (202.5..247.5).contains(&d) => Direction::LeftUp,
        d if (247.5..292.5).contains(&d) => Direction::Up,
        d if (292.5..337.5).contains(&d) => Direction::RightUp,
        _ => Direction::Right,
    }
}
