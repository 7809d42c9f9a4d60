//! # Speed Mapper
//!
//! Maps the right trigger to the speed byte sent with movement commands.
//!
//! A trigger at rest reads -1.0. Anything at or below [`TRIGGER_REST`] is
//! treated as fully released and yields [`Speed::DEFAULT`]; past that point
//! the speed is `round((t + 1) * 100)`, so a half-pressed trigger gives 100
//! and a fully pressed one 200. The jump from 50 to roughly 1 right after
//! the rest threshold is expected.

use std::fmt;

/// Trigger reading at or below which the trigger counts as released.
pub const TRIGGER_REST: f32 = -0.99;

/// Speed value carried in the `byValue` field of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    /// Speed used when the trigger is released and for zoom/idle commands.
    pub const DEFAULT: Speed = Speed(50);

    /// Fixed value sent with preset save/recall commands.
    pub const PRESET: Speed = Speed(254);

    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps a trigger reading in `[-1, 1]` to a speed.
///
/// # Examples
///
/// ```
/// use ptz_pad::ptz::speed::{map_speed, Speed};
///
/// assert_eq!(map_speed(-1.0), Speed::DEFAULT);
/// assert_eq!(map_speed(0.0).value(), 100);
/// assert_eq!(map_speed(1.0).value(), 200);
/// ```
#[must_use]
pub fn map_speed(trigger: f32) -> Speed {
    if trigger <= TRIGGER_REST {
        return Speed::DEFAULT;
    }

    let scaled = ((trigger.min(1.0) + 1.0) * 100.0).round();
    Speed(scaled.clamp(0.0, f32::from(u8::MAX)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_released_trigger_uses_default() {
        assert_eq!(map_speed(-1.0), Speed::DEFAULT);
        assert_eq!(map_speed(-0.99), Speed::DEFAULT);
        assert_eq!(map_speed(-1.0).value(), 50);
    }

    #[test]
    fn test_just_past_rest_is_slow() {
        // Discontinuity: leaving the rest band drops the speed below default
        assert_eq!(map_speed(-0.98).value(), 2);
    }

    #[test]
    fn test_linear_range() {
        assert_eq!(map_speed(0.0).value(), 100);
        assert_eq!(map_speed(0.5).value(), 150);
        assert_eq!(map_speed(1.0).value(), 200);
        assert_eq!(map_speed(-0.5).value(), 50);
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(map_speed(0.004).value(), 100);
        assert_eq!(map_speed(0.006).value(), 101);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(map_speed(1.5).value(), 200);
    }

    #[test]
    fn test_speed_constants() {
        assert_eq!(Speed::DEFAULT.value(), 50);
        assert_eq!(Speed::PRESET.value(), 254);
        assert_eq!(Speed::default(), Speed::DEFAULT);
        assert_eq!(Speed::new(120).to_string(), "120");
    }
}
