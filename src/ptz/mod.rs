//! # PTZ Module
//!
//! Translation of analog controller input into pan/tilt/zoom commands.
//!
//! This module handles:
//! - Classifying the movement stick into one of eight directions
//! - Classifying the zoom axis into zoom in / zoom out / neutral
//! - Mapping the trigger axis to a command speed
//! - Edge-triggered start/stop command emission
//! - Encoding commands into the camera's wire payload

pub mod command;
pub mod direction;
pub mod motion;
pub mod speed;
pub mod zoom;
