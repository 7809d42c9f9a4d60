//! # Motion State Machine
//!
//! Turns a stream of axis samples into edge-triggered camera commands.
//!
//! The machine remembers the direction, zoom and speed it last acted on.
//! Each sample is classified and compared against that state, and commands
//! are only produced when something changed. A running motion is always
//! stopped before a new one on the same axis group is started.
//!
//! The machine performs no I/O: [`MotionStateMachine::transition`] and
//! [`MotionStateMachine::idle_check`] return the commands to send, in order.
//! State is updated before the caller transmits anything and is never rolled
//! back when a transmission fails.
//!
//! ## Usage
//!
//! ```
//! use ptz_pad::ptz::motion::{AxisSample, MotionStateMachine};
//!
//! let mut machine = MotionStateMachine::new();
//!
//! let commands = machine.transition(&AxisSample::new(1.0, 0.0, 0.0, -1.0));
//! assert_eq!(commands[0].name(), "right_start");
//!
//! // Same sample again: nothing to send
//! assert!(machine.transition(&AxisSample::new(1.0, 0.0, 0.0, -1.0)).is_empty());
//! ```

use tracing::debug;

use super::command::PtzCommand;
use super::direction::{classify_direction, in_deadzone, Direction};
use super::speed::{map_speed, Speed};
use super::zoom::{classify_zoom, ZoomState};

/// One reading of every tracked analog input, each normalised to `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    /// Movement stick X (left stick horizontal).
    pub x: f32,
    /// Movement stick Y (left stick vertical, down is positive).
    pub y: f32,
    /// Zoom axis (right stick vertical).
    pub zoom: f32,
    /// Speed trigger (right trigger, -1.0 when released).
    pub trigger: f32,
}

impl Default for AxisSample {
    /// Sticks centred, trigger released.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 0.0,
            trigger: -1.0,
        }
    }
}

impl AxisSample {
    #[must_use]
    pub fn new(x: f32, y: f32, zoom: f32, trigger: f32) -> Self {
        Self { x, y, zoom, trigger }
    }
}

/// What the camera was last told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionState {
    pub direction: Direction,
    pub zoom: ZoomState,
    pub speed: Speed,
}

/// Edge-triggered translator from axis samples to commands.
#[derive(Debug, Default)]
pub struct MotionStateMachine {
    state: MotionState,
}

impl MotionStateMachine {
    /// Starts neutral on both axis groups at the default speed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Processes one axis sample.
    ///
    /// Zoom is handled first, then movement. Returns the commands to send,
    /// in order; an empty vector means nothing changed.
    ///
    /// A speed change alone restarts the current direction: the direction is
    /// stopped and started again at the new speed.
    pub fn transition(&mut self, sample: &AxisSample) -> Vec<PtzCommand> {
        let new_direction = classify_direction(sample.x, sample.y);
        let new_zoom = classify_zoom(sample.zoom);
        let new_speed = map_speed(sample.trigger);

        let mut commands = Vec::new();

        if new_zoom != self.state.zoom {
            commands.extend(PtzCommand::zoom_stop(self.state.zoom));
            commands.extend(PtzCommand::zoom_start(new_zoom));
            debug!("Zoom {} -> {}", self.state.zoom, new_zoom);
            self.state.zoom = new_zoom;
        }

        if new_direction != self.state.direction || new_speed != self.state.speed {
            commands.extend(PtzCommand::move_stop(self.state.direction, new_speed));
            commands.extend(PtzCommand::move_start(new_direction, new_speed));
            debug!(
                "Movement {}@{} -> {}@{}",
                self.state.direction, self.state.speed, new_direction, new_speed
            );
            self.state.direction = new_direction;
            self.state.speed = new_speed;
        }

        commands
    }

    /// Stops a running movement whose stick has settled inside the deadzone.
    ///
    /// Runs after every batch of input events, using the most recent sample.
    /// Catches the case where the stick returned to rest without producing
    /// an axis event that crossed back into the deadzone.
    pub fn idle_check(&mut self, sample: &AxisSample) -> Option<PtzCommand> {
        if self.state.direction.is_neutral() || !in_deadzone(sample.x, sample.y) {
            return None;
        }

        let stop = PtzCommand::move_stop(self.state.direction, Speed::DEFAULT);
        debug!("Stick at rest, stopping {}", self.state.direction);
        self.state.direction = Direction::Neutral;
        stop
    }

    /// Forgets the current motion without emitting anything.
    ///
    /// Used when the controller disappears; the camera is stopped separately.
    pub fn reset(&mut self) {
        self.state = MotionState::default();
    }
}
