//! # Bridge Module
//!
//! The event loop tying controller input to the camera and side effects.
//!
//! This module handles:
//! - Polling the input source one batch at a time
//! - Running axis samples through the motion state machine
//! - Dispatching button presses to presets, screenshots and the light
//! - Backing off and resuming after per-iteration failures

pub mod dispatcher;
pub mod runtime;

pub use runtime::{Bridge, StepOutcome};
