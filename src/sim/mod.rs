//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major over the grid)
//! - No rendering or platform dependencies

pub mod board;
pub mod cluster;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod hex;
pub mod placement;
pub mod state;
pub mod tick;

pub use board::{Board, Cell};
pub use cluster::{Resolution, find_cluster, resolve_placement};
pub use error::SimError;
pub use geometry::{GridLayout, GridPos, is_odd_row};
pub use hex::{are_adjacent, neighbors};
pub use placement::find_nearest_free_cell;
pub use state::{BubbleView, Cannon, GameEvent, GameState, Projectile, ShotOutcome, Snapshot};
pub use tick::{TickInput, start_level, tick};
