//! Bubble Clutter - a hex-grid bubble shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, placement search, clusters, shot lifecycle)
//! - `tuning`: Data-driven game balance and playfield layout
//! - `platform`: Browser bindings for the rendering/input collaborator

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Bubble defaults
    pub const BUBBLE_RADIUS: f32 = 20.0;
    /// Cells in an even row (odd rows hold one fewer)
    pub const BUBBLE_COLS: u32 = (PLAYFIELD_WIDTH / (BUBBLE_RADIUS * 2.0)) as u32;
    /// Y of row 0 centers
    pub const BUBBLE_START_Y: f32 = 50.0;

    /// Rows generated at level start
    pub const MIN_BUBBLE_ROWS: u32 = 3;
    pub const MAX_BUBBLE_ROWS: u32 = 7;
    /// Rows allowed past MAX_BUBBLE_ROWS before the board is full
    pub const EXTRA_ROW_BUFFER: u32 = 3;

    /// Palette size (color indices are 0..PALETTE_SIZE)
    pub const PALETTE_SIZE: u8 = 6;

    /// Projectile speed in pixels per tick
    pub const SHOT_SPEED: f32 = 10.0;
    /// Cannon slide speed in pixels per tick
    pub const CANNON_SPEED: f32 = 10.0;
    /// Cannon distance from the bottom edge
    pub const CANNON_BOTTOM_OFFSET: f32 = 20.0;

    /// Default breadth limit for the placement search
    pub const PLACEMENT_MAX_DEPTH: u32 = 6;

    /// Score lost when a shot leaves the playfield
    pub const MISS_PENALTY: u64 = 50;
}

/// Clamp an aim angle to the upper half-plane `[-π, 0]`
///
/// Screen y grows downward, so "up" is negative. NaN aims straight up.
#[inline]
pub fn clamp_aim_angle(angle: f32) -> f32 {
    use std::f32::consts::{FRAC_PI_2, PI};
    if angle.is_nan() {
        return -FRAC_PI_2;
    }
    angle.clamp(-PI, 0.0)
}

/// Unit direction for an aim angle
#[inline]
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Aim angle from the cannon toward a pointer position
///
/// Pointers below the cannon snap to the nearer horizontal.
pub fn aim_toward(cannon: Vec2, pointer: Vec2) -> f32 {
    use std::f32::consts::PI;
    let delta = pointer - cannon;
    let angle = delta.y.atan2(delta.x);
    if angle > 0.0 {
        return if delta.x > 0.0 { 0.0 } else { -PI };
    }
    clamp_aim_angle(angle)
}
