//! Hex-offset grid geometry
//!
//! Even rows hold `cols` bubbles starting at the left wall; odd rows hold one
//! fewer, pushed right by a radius so they nest between the even-row bubbles.
//! Screen y grows downward and row 0 is the top row.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Integer grid coordinate (may be negative or out of range while searching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Odd-row test that stays false for negative rows, matching the pixel
/// mapping's half-column shift.
#[inline]
pub fn is_odd_row(row: i32) -> bool {
    row % 2 == 1
}

/// Pixel layout of the bubble grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub width: f32,
    pub radius: f32,
    /// Cells in an even row
    pub cols: u32,
    /// Y of row 0 centers
    pub top_margin: f32,
}

impl GridLayout {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            width: tuning.width,
            radius: tuning.bubble_radius,
            cols: tuning.cols,
            top_margin: tuning.top_margin,
        }
    }

    /// Cells in `row`: `cols` for even rows, `cols - 1` for odd rows
    #[inline]
    pub fn cols_in_row(&self, row: i32) -> u32 {
        if row.rem_euclid(2) == 0 {
            self.cols
        } else {
            self.cols.saturating_sub(1)
        }
    }

    /// Whether `col` lies inside `row`'s column range
    #[inline]
    pub fn col_in_row(&self, row: i32, col: i32) -> bool {
        col >= 0 && (col as u32) < self.cols_in_row(row)
    }

    /// Pixel center of a grid cell
    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        let odd = pos.row.rem_euclid(2) == 1;
        let offset = if odd { self.radius } else { 0.0 };
        let effective_cols = self.cols_in_row(pos.row).max(1) as f32;
        let spacing = self.width / (effective_cols + if odd { 0.5 } else { 0.0 });

        let x = pos.col as f32 * spacing + offset + self.radius;
        let y = pos.row as f32 * (self.radius * 2.0) + self.top_margin;
        Vec2::new(x, y)
    }

    /// Approximate grid cell under a pixel (placement search seed only)
    ///
    /// Uses true hex row height (`r·√3`) and 1.5r column width, which does
    /// not match `cell_center`'s packing. The result may be out of range or
    /// occupied.
    pub fn pixel_to_grid(&self, point: Vec2) -> GridPos {
        let row_height = self.radius * 3f32.sqrt();
        let row = (point.y / row_height).floor() as i32;
        let col_width = self.radius * 1.5;
        let shift = if is_odd_row(row) { col_width / 2.0 } else { 0.0 };
        let col = ((point.x - shift) / col_width).floor() as i32;
        GridPos::new(row, col)
    }

    /// Squared distance from a cell's center to a point
    #[inline]
    pub fn distance_sq(&self, pos: GridPos, point: Vec2) -> f32 {
        self.cell_center(pos).distance_squared(point)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
