//! # PTZ Command Encoder
//!
//! Builds camera commands and encodes them into the payload accepted by the
//! camera's `ajaxcom` endpoint.
//!
//! ## Wire Format
//!
//! The camera expects a form field `szCmd` whose value is a JSON document:
//!
//! ```text
//! {"SysCtrl":{"PtzCtrl":{"nChanel":0,"szPtzCmd":"<name>","byValue":<speed>}}}
//! ```
//!
//! `<name>` is one of `{direction}_start`, `{direction}_stop`,
//! `zoomadd_start`, `zoomadd_stop`, `zoomdec_start`, `zoomdec_stop`,
//! `preset_set` or `preset_call`.

use serde::Serialize;
use std::fmt;

use super::direction::Direction;
use super::speed::Speed;
use super::zoom::ZoomState;

/// Form field name carrying the encoded command.
pub const FORM_FIELD: &str = "szCmd";

/// Video channel addressed by every command.
pub const DEFAULT_CHANNEL: u8 = 0;

/// A single camera command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtzCommand {
    name: String,
    speed: Speed,
}

impl PtzCommand {
    /// Creates a command from a raw camera command name.
    #[must_use]
    pub fn new(name: impl Into<String>, speed: Speed) -> Self {
        Self {
            name: name.into(),
            speed,
        }
    }

    /// `{direction}_start`, or `None` for [`Direction::Neutral`].
    #[must_use]
    pub fn move_start(direction: Direction, speed: Speed) -> Option<Self> {
        direction
            .command_name()
            .map(|name| Self::new(format!("{}_start", name), speed))
    }

    /// `{direction}_stop`, or `None` for [`Direction::Neutral`].
    #[must_use]
    pub fn move_stop(direction: Direction, speed: Speed) -> Option<Self> {
        direction
            .command_name()
            .map(|name| Self::new(format!("{}_stop", name), speed))
    }

    /// `zoomadd_start` / `zoomdec_start` at the default speed.
    #[must_use]
    pub fn zoom_start(zoom: ZoomState) -> Option<Self> {
        zoom.command_name()
            .map(|name| Self::new(format!("{}_start", name), Speed::DEFAULT))
    }

    /// `zoomadd_stop` / `zoomdec_stop` at the default speed.
    #[must_use]
    pub fn zoom_stop(zoom: ZoomState) -> Option<Self> {
        zoom.command_name()
            .map(|name| Self::new(format!("{}_stop", name), Speed::DEFAULT))
    }

    /// Stores the current position as a preset.
    #[must_use]
    pub fn preset_set() -> Self {
        Self::new("preset_set", Speed::PRESET)
    }

    /// Moves the camera back to the stored preset.
    #[must_use]
    pub fn preset_call() -> Self {
        Self::new("preset_call", Speed::PRESET)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn speed(&self) -> Speed {
        self.speed
    }
}

impl fmt::Display for PtzCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.speed)
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "SysCtrl")]
    sys_ctrl: SysCtrl<'a>,
}

#[derive(Serialize)]
struct SysCtrl<'a> {
    #[serde(rename = "PtzCtrl")]
    ptz_ctrl: PtzCtrl<'a>,
}

// Field order matters to the camera firmware; serde keeps declaration order.
#[derive(Serialize)]
struct PtzCtrl<'a> {
    #[serde(rename = "nChanel")]
    channel: u8,
    #[serde(rename = "szPtzCmd")]
    command: &'a str,
    #[serde(rename = "byValue")]
    value: u8,
}

/// Encoded command, ready to be sent as a form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPayload {
    json: String,
}

impl CommandPayload {
    /// The JSON document placed in the `szCmd` form field.
    #[must_use]
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Form fields for the HTTP request body.
    #[must_use]
    pub fn form(&self) -> [(&'static str, &str); 1] {
        [(FORM_FIELD, self.json.as_str())]
    }
}

/// Encodes a command for the given video channel.
///
/// # Examples
///
/// ```
/// use ptz_pad::ptz::command::{encode_command, PtzCommand};
/// use ptz_pad::ptz::speed::Speed;
///
/// let payload = encode_command(&PtzCommand::new("up_start", Speed::new(80)), 0);
/// assert_eq!(
///     payload.json(),
///     r#"{"SysCtrl":{"PtzCtrl":{"nChanel":0,"szPtzCmd":"up_start","byValue":80}}}"#
/// );
/// ```
#[must_use]
pub fn encode_command(command: &PtzCommand, channel: u8) -> CommandPayload {
    let envelope = Envelope {
        sys_ctrl: SysCtrl {
            ptz_ctrl: PtzCtrl {
                channel,
                command: command.name(),
                value: command.speed().value(),
            },
        },
    };

    // Plain structs of strings and integers always serialize
    let json = serde_json::to_string(&envelope).unwrap_or_default();
    CommandPayload { json }
}
