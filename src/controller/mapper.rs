//! # Controller Input Mapper Module
//!
//! This module converts raw evdev events from the controller into
//! [`ControllerEvent`]s and keeps the current [`AxisSample`].
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Role |
//! |------|------------|------|
//! | Left Stick X | ABS_X | Pan |
//! | Left Stick Y | ABS_Y | Tilt |
//! | Right Stick Y | ABS_RY | Zoom |
//! | Right Trigger | ABS_RZ | Speed |
//!
//! Other axes (right stick X, left trigger, d-pad) are ignored.
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code |
//! |--------|------------|
//! | South (A) | BTN_SOUTH |
//! | East (B) | BTN_EAST |
//! | North | BTN_NORTH |
//! | West | BTN_WEST |
//! | Left shoulder | BTN_TL |
//! | Right shoulder | BTN_TR |
//! | Select / View | BTN_SELECT |
//! | Start / Menu | BTN_START |
//! | Guide | BTN_MODE |
//! | Stick clicks | BTN_THUMBL, BTN_THUMBR |
//!
//! Key repeat events (value 2) are dropped so that only press and release
//! edges reach the dispatcher.

use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key};

use super::{Button, ControllerEvent};
use crate::config::ControllerConfig;
use crate::ptz::motion::AxisSample;

/// Raw value range reported by the kernel for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Scales a raw value to `[-1, 1]`, `min` mapping to -1.0.
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f32 {
        let span = (i64::from(self.max) - i64::from(self.min)) as f32;
        if span <= 0.0 {
            return 0.0;
        }

        let offset = (i64::from(raw) - i64::from(self.min)) as f32;
        (offset / span * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// Parses raw evdev events and maintains the current axis sample.
///
/// `EventMapper` is not thread-safe. Use from a single task only.
#[derive(Debug)]
pub struct EventMapper {
    stick: AxisRange,
    trigger: AxisRange,
    sample: AxisSample,
}

impl EventMapper {
    #[must_use]
    pub fn new(stick: AxisRange, trigger: AxisRange) -> Self {
        Self {
            stick,
            trigger,
            sample: AxisSample::default(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            AxisRange::new(config.stick_min, config.stick_max),
            AxisRange::new(config.trigger_min, config.trigger_max),
        )
    }

    /// The sample reflecting every axis event processed so far.
    #[must_use]
    pub fn sample(&self) -> AxisSample {
        self.sample
    }

    /// Processes a single evdev event.
    ///
    /// Returns `Some` for tracked axis movement and for button edges.
    /// Synchronization events are not handled here; the caller uses them to
    /// delimit batches.
    pub fn process_event(&mut self, event: &InputEvent) -> Option<ControllerEvent> {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => self.process_axis_event(axis, event.value()),
            InputEventKind::Key(key) => process_key_event(key, event.value()),
            _ => None,
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) -> Option<ControllerEvent> {
        match axis {
            AbsoluteAxisType::ABS_X => self.sample.x = self.stick.normalize(value),
            AbsoluteAxisType::ABS_Y => self.sample.y = self.stick.normalize(value),
            AbsoluteAxisType::ABS_RY => self.sample.zoom = self.stick.normalize(value),
            AbsoluteAxisType::ABS_RZ => self.sample.trigger = self.trigger.normalize(value),
            _ => return None,
        }

        Some(ControllerEvent::Axis(self.sample))
    }

    /// Back to centred sticks and a released trigger.
    ///
    /// Called when the controller disconnects so that stale deflection does
    /// not survive a reconnect.
    pub fn reset(&mut self) {
        self.sample = AxisSample::default();
    }
}

fn process_key_event(key: Key, value: i32) -> Option<ControllerEvent> {
    let button = button_for_key(key)?;
    match value {
        0 => Some(ControllerEvent::ButtonReleased(button)),
        1 => Some(ControllerEvent::ButtonPressed(button)),
        _ => None,
    }
}

/// Maps an evdev key code to a controller button.
#[must_use]
pub fn button_for_key(key: Key) -> Option<Button> {
    let button = match key {
        Key::BTN_SOUTH => Button::South,
        Key::BTN_EAST => Button::East,
        Key::BTN_WEST => Button::West,
        Key::BTN_NORTH => Button::North,
        Key::BTN_TL => Button::LeftShoulder,
        Key::BTN_TR => Button::RightShoulder,
        Key::BTN_SELECT => Button::Select,
        Key::BTN_START => Button::Start,
        Key::BTN_MODE => Button::Mode,
        Key::BTN_THUMBL => Button::LeftThumb,
        Key::BTN_THUMBR => Button::RightThumb,
        _ => return None,
    };
    Some(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::EventType;

    const STICK: AxisRange = AxisRange::new(-32768, 32767);
    const TRIGGER: AxisRange = AxisRange::new(0, 1023);

    /// Helper to create an axis event for testing.
    fn make_axis_event(axis: AbsoluteAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::ABSOLUTE, axis.0, value)
    }

    /// Helper to create a key event for testing.
    fn make_key_event(key: Key, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), value)
    }

    fn axis_sample(event: Option<ControllerEvent>) -> AxisSample {
        match event {
            Some(ControllerEvent::Axis(sample)) => sample,
            other => panic!("Expected axis event, got: {:?}", other),
        }
    }

    // ==================== AxisRange Tests ====================

    #[test]
    fn test_normalize_stick_extremes() {
        assert_eq!(STICK.normalize(-32768), -1.0);
        assert_eq!(STICK.normalize(32767), 1.0);
        assert!(STICK.normalize(0).abs() < 0.001, "Centre should be close to zero");
    }

    #[test]
    fn test_normalize_trigger() {
        assert_eq!(TRIGGER.normalize(0), -1.0, "Released trigger should read -1");
        assert_eq!(TRIGGER.normalize(1023), 1.0);
        assert!((TRIGGER.normalize(511) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        assert_eq!(TRIGGER.normalize(2000), 1.0);
        assert_eq!(TRIGGER.normalize(-5), -1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(AxisRange::new(10, 10).normalize(10), 0.0);
        assert_eq!(AxisRange::new(10, 0).normalize(5), 0.0);
    }

    // ==================== EventMapper Tests ====================

    #[test]
    fn test_event_mapper_initial_sample() {
        let mapper = EventMapper::new(STICK, TRIGGER);
        assert_eq!(mapper.sample(), AxisSample::default());
        assert_eq!(mapper.sample().trigger, -1.0);
    }

    #[test]
    fn test_left_stick_updates_movement_axes() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);

        let sample = axis_sample(mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 32767)));
        assert_eq!(sample.x, 1.0);

        let sample = axis_sample(mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_Y, -32768)));
        assert_eq!(sample.x, 1.0, "X should be retained across events");
        assert_eq!(sample.y, -1.0);
    }

    #[test]
    fn test_right_stick_y_is_zoom() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        let sample = axis_sample(mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RY, -32768)));
        assert_eq!(sample.zoom, -1.0);
    }

    #[test]
    fn test_right_trigger_is_speed() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        let sample = axis_sample(mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RZ, 1023)));
        assert_eq!(sample.trigger, 1.0);
    }

    #[test]
    fn test_untracked_axes_ignored() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        for axis in [
            AbsoluteAxisType::ABS_RX,
            AbsoluteAxisType::ABS_Z,
            AbsoluteAxisType::ABS_HAT0X,
            AbsoluteAxisType::ABS_HAT0Y,
        ] {
            assert!(mapper.process_event(&make_axis_event(axis, 100)).is_none());
        }
        assert_eq!(mapper.sample(), AxisSample::default());
    }

    #[test]
    fn test_button_edges() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);

        assert_eq!(
            mapper.process_event(&make_key_event(Key::BTN_SOUTH, 1)),
            Some(ControllerEvent::ButtonPressed(Button::South))
        );
        assert_eq!(
            mapper.process_event(&make_key_event(Key::BTN_SOUTH, 0)),
            Some(ControllerEvent::ButtonReleased(Button::South))
        );
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        assert!(mapper.process_event(&make_key_event(Key::BTN_TL, 2)).is_none());
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        assert!(mapper.process_event(&make_key_event(Key::KEY_A, 1)).is_none());
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(button_for_key(Key::BTN_NORTH), Some(Button::North));
        assert_eq!(button_for_key(Key::BTN_TL), Some(Button::LeftShoulder));
        assert_eq!(button_for_key(Key::BTN_TR), Some(Button::RightShoulder));
        assert_eq!(button_for_key(Key::BTN_MODE), Some(Button::Mode));
        assert_eq!(button_for_key(Key::KEY_ENTER), None);
    }

    #[test]
    fn test_sync_events_ignored() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        let sync = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);
        assert!(mapper.process_event(&sync).is_none());
    }

    #[test]
    fn test_reset() {
        let mut mapper = EventMapper::new(STICK, TRIGGER);
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 32767));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RZ, 600));
        mapper.reset();
        assert_eq!(mapper.sample(), AxisSample::default());
    }
}
