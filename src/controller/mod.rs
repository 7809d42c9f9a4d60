//! # Controller Module
//!
//! Game controller input handling.
//!
//! This module handles:
//! - Controller detection and connection via evdev
//! - Normalising analog sticks and triggers to `[-1, 1]`
//! - Grouping raw events into batches at each `SYN_REPORT`
//! - Hot-plug: reporting disconnects and re-detecting the controller
//! - Rumble feedback through force feedback effects

pub mod gamepad;
pub mod mapper;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::ptz::motion::AxisSample;

/// Controller buttons, named by position on the face of the pad.
///
/// On an Xbox layout `South` is A and `North` is Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    Select,
    Start,
    /// Guide / home button.
    Mode,
    LeftThumb,
    RightThumb,
}

/// Event produced by an input source.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// A controller became available.
    Connected { name: String },
    /// The controller went away; no further events until `Connected`.
    Disconnected,
    /// A tracked axis moved. Carries the full current sample.
    Axis(AxisSample),
    ButtonPressed(Button),
    ButtonReleased(Button),
}

/// Source of controller events.
///
/// Events are delivered in batches, one batch per input report. The event
/// loop processes a whole batch before running its idle check.
#[async_trait]
pub trait InputSource: Send {
    /// Waits for the next batch of events.
    ///
    /// An empty batch is valid (for example a report that only touched
    /// untracked axes, or a reconnect attempt that found nothing).
    async fn next_batch(&mut self) -> Result<Vec<ControllerEvent>>;

    /// Runs full-intensity rumble for `duration`, then stops it.
    ///
    /// Does nothing when the controller is absent or cannot rumble.
    async fn rumble(&mut self, duration: Duration) -> Result<()>;
}
