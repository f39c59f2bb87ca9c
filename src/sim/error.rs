//! Simulation error taxonomy
//!
//! None of these end the process. The controller turns each into a shot
//! outcome or a board reset.

use thiserror::Error;

use super::geometry::GridPos;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Placement search ran out of depth without reaching a free cell
    #[error("No free cell within {max_depth} steps of {seed:?}")]
    NoFreeCellFound { seed: GridPos, max_depth: u32 },

    /// A placement column lies outside its row
    #[error("Column {col} is outside row {row} ({cols} columns)")]
    InvalidPlacementColumn { row: i32, col: i32, cols: u32 },

    /// Shifting rows down would pass the row ceiling
    #[error("Board full: {rows} rows at ceiling {ceiling}")]
    BoardOverflow { rows: usize, ceiling: usize },
}
