//! # Effects Module
//!
//! Side effects triggered by controller buttons, independent of camera
//! motion.
//!
//! This module handles:
//! - Grabbing a single frame from the camera's RTSP stream
//! - Switching a light on the lighting controller

pub mod light;
pub mod screenshot;
