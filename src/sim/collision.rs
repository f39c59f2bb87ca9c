//! Projectile collision checks
//!
//! The projectile is a disk of bubble radius. It bounces off the side walls,
//! sticks when it touches a board bubble or the top area, and is lost once
//! it is fully below the playfield.

use glam::Vec2;

use super::board::Board;
use super::geometry::{GridLayout, GridPos};

/// Result of a side-wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBounce {
    /// Whether a wall was hit
    pub hit: bool,
    /// Position after clamping inside the walls
    pub pos: Vec2,
    /// Velocity after reflection
    pub vel: Vec2,
}

/// Clamp to the side walls and reflect the horizontal velocity on contact
pub fn bounce_off_side_walls(pos: Vec2, vel: Vec2, radius: f32, width: f32) -> WallBounce {
    if pos.x < radius {
        WallBounce {
            hit: true,
            pos: Vec2::new(radius, pos.y),
            vel: Vec2::new(-vel.x, vel.y),
        }
    } else if pos.x > width - radius {
        WallBounce {
            hit: true,
            pos: Vec2::new(width - radius, pos.y),
            vel: Vec2::new(-vel.x, vel.y),
        }
    } else {
        WallBounce {
            hit: false,
            pos,
            vel,
        }
    }
}

/// First active bubble (row-major) whose disk overlaps the projectile
pub fn first_overlap(board: &Board, pos: Vec2) -> Option<GridPos> {
    let layout = board.layout();
    let reach = layout.radius * 2.0;
    board
        .active_cells()
        .map(|(cell, _)| cell)
        .find(|&cell| layout.cell_center(cell).distance_squared(pos) < reach * reach)
}

/// Projectile has risen into the top row band
#[inline]
pub fn reached_top(pos: Vec2, layout: &GridLayout) -> bool {
    pos.y <= layout.top_margin + layout.radius
}

/// Projectile is fully below the playfield
#[inline]
pub fn exited_bottom(pos: Vec2, radius: f32, height: f32) -> bool {
    pos.y > height + radius
}
