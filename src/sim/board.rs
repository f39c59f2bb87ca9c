//! Bubble board storage
//!
//! Dense per-row storage: row `r` always has exactly `cols_in_row(r)` slots,
//! so a cell can never sit outside its row. Rows below the last materialized
//! row read as empty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::geometry::{GridLayout, GridPos};
use crate::tuning::Tuning;

/// One bubble slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Palette index
    pub color: u8,
    /// Present and not yet cleared
    pub active: bool,
}

impl Cell {
    pub fn new(color: u8) -> Self {
        Self {
            color,
            active: true,
        }
    }
}

/// The bubble grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: GridLayout,
    /// Row count assumed for an empty board when bounding the search
    base_rows: usize,
    /// Headroom past the row count (search) or past `base_rows` (overflow)
    extra_rows: usize,
    rows: Vec<Vec<Option<Cell>>>,
}

impl Board {
    pub fn new(layout: GridLayout, base_rows: usize, extra_rows: usize) -> Self {
        Self {
            layout,
            base_rows,
            extra_rows,
            rows: Vec::new(),
        }
    }

    /// Empty board sized by the tuning
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            GridLayout::from_tuning(tuning),
            tuning.max_rows as usize,
            tuning.extra_rows as usize,
        )
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Materialized rows (including trailing rows that hold no active cell)
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row count at which `shift_down` overflows
    #[inline]
    pub fn row_ceiling(&self) -> usize {
        self.base_rows + self.extra_rows
    }

    /// First row the placement search may not enter
    #[inline]
    pub fn search_ceiling(&self) -> usize {
        let rows = if self.rows.is_empty() {
            self.base_rows
        } else {
            self.rows.len()
        };
        rows + self.extra_rows
    }

    #[inline]
    pub fn cols_in_row(&self, row: i32) -> u32 {
        self.layout.cols_in_row(row)
    }

    /// Slot lookup; `None` for empty or off-grid positions
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.rows
            .get(pos.row as usize)?
            .get(pos.col as usize)
            .copied()
            .flatten()
    }

    /// Color of the active bubble at `pos`, if any
    pub fn active_color(&self, pos: GridPos) -> Option<u8> {
        self.cell(pos).filter(|c| c.active).map(|c| c.color)
    }

    #[inline]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.active_color(pos).is_some()
    }

    /// A bubble could go here: on-grid column and no active bubble
    ///
    /// Rows that are not materialized yet count as free.
    pub fn is_free(&self, pos: GridPos) -> bool {
        pos.row >= 0 && self.layout.col_in_row(pos.row, pos.col) && !self.is_occupied(pos)
    }

    /// On-grid and above the search ceiling, regardless of occupancy
    pub fn is_in_bounds(&self, pos: GridPos) -> bool {
        pos.row >= 0
            && (pos.row as usize) < self.search_ceiling()
            && self.layout.col_in_row(pos.row, pos.col)
    }

    /// Place an active bubble, materializing rows as needed
    pub fn set(&mut self, pos: GridPos, color: u8) -> Result<(), SimError> {
        if pos.row < 0 || !self.layout.col_in_row(pos.row, pos.col) {
            return Err(SimError::InvalidPlacementColumn {
                row: pos.row,
                col: pos.col,
                cols: self.cols_in_row(pos.row),
            });
        }

        let row = pos.row as usize;
        while self.rows.len() <= row {
            let width = self.cols_in_row(self.rows.len() as i32) as usize;
            self.rows.push(vec![None; width]);
        }
        self.rows[row][pos.col as usize] = Some(Cell::new(color));
        Ok(())
    }

    /// Clear the bubble at `pos`; returns whether an active bubble was there
    pub fn deactivate(&mut self, pos: GridPos) -> bool {
        if pos.row < 0 || pos.col < 0 {
            return false;
        }
        let slot = self
            .rows
            .get_mut(pos.row as usize)
            .and_then(|row| row.get_mut(pos.col as usize));
        match slot {
            Some(Some(cell)) if cell.active => {
                cell.active = false;
                true
            }
            _ => false,
        }
    }

    /// Replace the board with `row_count` full rows of random colors
    pub fn regenerate<R: Rng>(&mut self, row_count: usize, colors: u8, rng: &mut R) {
        self.rows.clear();
        for row in 0..row_count {
            let fresh = self.random_row(row as i32, colors, rng);
            self.rows.push(fresh);
        }
    }

    fn random_row<R: Rng>(&self, row: i32, colors: u8, rng: &mut R) -> Vec<Option<Cell>> {
        let colors = colors.max(1);
        (0..self.cols_in_row(row))
            .map(|_| Some(Cell::new(rng.random_range(0..colors))))
            .collect()
    }

    /// Push every row down by one and fill a new top row
    ///
    /// Rejected with `BoardOverflow` (board untouched) once the row count
    /// has reached the ceiling. Bubbles carried into a narrower odd row past
    /// its last column are dropped; their pre-shift positions are returned.
    pub fn shift_down<R: Rng>(&mut self, colors: u8, rng: &mut R) -> Result<Vec<GridPos>, SimError> {
        let ceiling = self.row_ceiling();
        if self.rows.len() >= ceiling {
            return Err(SimError::BoardOverflow {
                rows: self.rows.len(),
                ceiling,
            });
        }

        let old_rows = std::mem::take(&mut self.rows);
        let mut dropped = Vec::new();
        let mut shifted = Vec::with_capacity(old_rows.len() + 1);
        shifted.push(self.random_row(0, colors, rng));

        for (r, old) in old_rows.into_iter().enumerate() {
            let width = self.cols_in_row(r as i32 + 1) as usize;
            let mut moved = vec![None; width];
            for (c, slot) in old.into_iter().enumerate() {
                match slot {
                    Some(cell) if cell.active && c < width => moved[c] = Some(cell),
                    Some(cell) if cell.active => {
                        dropped.push(GridPos::new(r as i32, c as i32));
                    }
                    _ => {}
                }
            }
            shifted.push(moved);
        }

        self.rows = shifted;
        Ok(dropped)
    }

    /// Active bubbles in row-major order
    pub fn active_cells(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, slot)| {
                slot.filter(|cell| cell.active)
                    .map(|cell| (GridPos::new(r as i32, c as i32), cell))
            })
        })
    }

    pub fn active_count(&self) -> usize {
        self.active_cells().count()
    }

    /// No active bubble remains
    pub fn is_cleared(&self) -> bool {
        self.active_cells().next().is_none()
    }
}
