//! # PTZ Pad Library
//!
//! Drive a networked PTZ camera with a game controller.
//!
//! This library translates analog stick and trigger input into edge-triggered
//! pan/tilt/zoom commands sent over HTTP, and maps controller buttons to
//! presets, screenshots and a light switch.

pub mod bridge;
pub mod camera;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod ptz;
