//! Session state and core simulation types
//!
//! Everything a running game needs lives in `GameState`; there is no global
//! state. The renderer learns about changes through `GameEvent`s.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::geometry::GridPos;
use crate::tuning::Tuning;
use crate::{aim_direction, clamp_aim_angle};

/// A bubble in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub color: u8,
}

/// The launcher at the bottom of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cannon {
    pub x: f32,
    pub y: f32,
    /// Radians in `[-π, 0]`; `-π/2` is straight up
    pub aim: f32,
}

impl Cannon {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.width / 2.0,
            y: tuning.height - crate::consts::CANNON_BOTTOM_OFFSET,
            aim: -std::f32::consts::FRAC_PI_2,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Slide horizontally, staying a radius away from either wall
    pub fn slide(&mut self, dx: f32, tuning: &Tuning) {
        let r = tuning.bubble_radius;
        self.x = (self.x + dx).clamp(r, (tuning.width - r).max(r));
    }
}

/// How a shot ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShotOutcome {
    /// Placed and completed a cluster that was removed
    Cleared { cell: GridPos, removed: usize, bonus: u64 },
    /// Placed without completing a cluster (rows shifted down)
    Placed { cell: GridPos },
    /// No free cell nearby; dropped (rows shifted down)
    Lost,
    /// Flew past the bottom edge (penalty, rows shifted down)
    Exited,
    /// Placement was rejected; dropped with no penalty
    Discarded,
}

/// Render/notification command for the collaborator, in tick order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ShotFired { color: u8, pos: Vec2, vel: Vec2 },
    PlaceBubble { cell: GridPos, color: u8, pos: Vec2 },
    RemoveBubbles { cells: Vec<GridPos> },
    /// Every bubble moved down one row. `dropped` lists pre-shift positions
    /// of bubbles that fell off the end of a narrower row. The new top row
    /// follows as `PlaceBubble`s.
    RowsShifted { dropped: Vec<GridPos> },
    ScoreChanged { score: u64 },
    LevelChanged { level: u32 },
    /// Board replaced; the new bubbles follow as `PlaceBubble`s
    BoardReset { rows: usize },
    ShotResolved { outcome: ShotOutcome },
    /// Board filled up; a new board for the same level follows
    GameOver { score: u64, level: u32 },
}

/// One active bubble as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleView {
    pub row: i32,
    pub col: i32,
    pub color: u8,
    pub x: f32,
    pub y: f32,
}

/// Read-only view of a session for collaborators and browser tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cannon: Cannon,
    pub score: u64,
    pub level: u32,
    pub rows: usize,
    pub projectile: Option<Projectile>,
    pub bubbles: Vec<BubbleView>,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub board: Board,
    /// 1-based
    pub level: u32,
    pub score: u64,
    pub cannon: Cannon,
    /// At most one shot in flight
    pub projectile: Option<Projectile>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub shots_fired: u64,
}

impl GameState {
    /// New session on level 1 with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// New session on level 1 with a generated board
    ///
    /// Invalid tuning is replaced by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning: {}", e);
                Tuning::default()
            }
        };
        let mut state = Self::empty(seed, tuning);
        super::tick::start_level(&mut state);
        state
    }

    /// New session on level 1 with nothing on the board
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            board: Board::from_tuning(&tuning),
            cannon: Cannon::new(&tuning),
            tuning,
            level: 1,
            score: 0,
            projectile: None,
            time_ticks: 0,
            shots_fired: 0,
        }
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        self.projectile.is_some()
    }

    /// Point the cannon (clamped to the upper half-plane)
    pub fn set_aim_angle(&mut self, angle: f32) {
        self.cannon.aim = clamp_aim_angle(angle);
    }

    /// Launch a projectile from the cannon along its aim
    ///
    /// No-op (returns `None`) while another shot is in flight.
    pub fn spawn_projectile(&mut self) -> Option<Projectile> {
        if self.in_flight() {
            return None;
        }
        let color = self.rng.random_range(0..self.tuning.palette_size.max(1));
        let shot = Projectile {
            pos: self.cannon.pos(),
            vel: aim_direction(self.cannon.aim) * self.tuning.shot_speed,
            color,
        };
        self.projectile = Some(shot);
        self.shots_fired += 1;
        Some(shot)
    }

    /// Aim and fire in one call
    ///
    /// Ignored entirely (aim included) while a shot is in flight.
    pub fn request_shot(&mut self, angle: f32) -> Option<Projectile> {
        if self.in_flight() {
            return None;
        }
        self.set_aim_angle(angle);
        self.spawn_projectile()
    }

    /// `PlaceBubble` for a board cell
    pub fn place_event(&self, cell: GridPos, color: u8) -> GameEvent {
        GameEvent::PlaceBubble {
            cell,
            color,
            pos: self.board.layout().cell_center(cell),
        }
    }

    /// Active bubbles with pixel centers, row-major
    pub fn bubbles(&self) -> Vec<BubbleView> {
        let layout = self.board.layout();
        self.board
            .active_cells()
            .map(|(pos, cell)| {
                let center = layout.cell_center(pos);
                BubbleView {
                    row: pos.row,
                    col: pos.col,
                    color: cell.color,
                    x: center.x,
                    y: center.y,
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cannon: self.cannon,
            score: self.score,
            level: self.level,
            rows: self.board.row_count(),
            projectile: self.projectile,
            bubbles: self.bubbles(),
        }
    }
}
