//! Spool Wire - a cable-routing puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cable routing, power flow, dragging)
//! - `level`: Level data format, built-in level pack and campaign order
//! - `progress`: Saved campaign progress
//! - `web`: Browser bindings (wasm32 only)

pub mod level;
pub mod progress;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use level::{Campaign, LevelData, LevelError, LevelPack};
pub use progress::Progress;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Level dimensions (the drag handle is clamped into this rectangle)
    pub const LEVEL_WIDTH: f32 = 1280.0;
    pub const LEVEL_HEIGHT: f32 = 720.0;

    /// Extra distance the end handle keeps from spools and isolators
    pub const SPOOL_CLEARANCE: f32 = 10.0;
    /// Distance at which the end handle snaps onto the finish target
    pub const FINISH_SNAP_RADIUS: f32 = 30.0;
    /// Pointer distance at which the end handle can be grabbed
    pub const END_GRAB_RADIUS: f32 = 30.0;

    /// Turn angle above which a left-wrapped spool is released
    pub const RELEASE_LEFT_ANGLE: f32 = PI * 1.8;
    /// Turn angle below which a right-wrapped spool is released
    pub const RELEASE_RIGHT_ANGLE: f32 = PI * 0.2;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    angle
}

/// Direction angle of a vector (atan2, radians)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Signed turn from one direction to the next, normalized to [0, 2π)
#[inline]
pub fn turn_angle(from: Vec2, to: Vec2) -> f32 {
    normalize_angle(heading(to) - heading(from))
}
