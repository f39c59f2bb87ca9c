//! Data-driven game balance
//!
//! Playfield layout and scoring knobs. Defaults reproduce the classic
//! 800x600 board; overrides are plain JSON so they can live in LocalStorage
//! on the web or in a file on native.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning override was rejected
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance and playfield configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    pub bubble_radius: f32,
    /// Cells in an even row
    pub cols: u32,
    /// Y of row 0 centers
    pub top_margin: f32,

    // === Board generation ===
    pub min_rows: u32,
    pub max_rows: u32,
    /// Rows tolerated past `max_rows` (row ceiling and search headroom)
    pub extra_rows: u32,
    pub palette_size: u8,

    // === Shot ===
    pub shot_speed: f32,
    pub cannon_speed: f32,
    /// Breadth limit for the placement search
    pub max_depth: u32,

    // === Scoring ===
    pub min_cluster: usize,
    pub cluster_base_score: u64,
    pub cluster_step_score: u64,
    pub cluster_bonus_cap: u64,
    pub level_bonus: u64,
    pub miss_penalty: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            bubble_radius: BUBBLE_RADIUS,
            cols: BUBBLE_COLS,
            top_margin: BUBBLE_START_Y,

            min_rows: MIN_BUBBLE_ROWS,
            max_rows: MAX_BUBBLE_ROWS,
            extra_rows: EXTRA_ROW_BUFFER,
            palette_size: PALETTE_SIZE,

            shot_speed: SHOT_SPEED,
            cannon_speed: CANNON_SPEED,
            max_depth: PLACEMENT_MAX_DEPTH,

            min_cluster: 3,
            cluster_base_score: 10,
            cluster_step_score: 5,
            cluster_bonus_cap: 50,
            level_bonus: 100,
            miss_penalty: MISS_PENALTY,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if !(self.width > 0.0) {
            return invalid("width", "must be positive");
        }
        if !(self.height > 0.0) {
            return invalid("height", "must be positive");
        }
        if !(self.bubble_radius > 0.0) {
            return invalid("bubble_radius", "must be positive");
        }
        if self.cols < 2 {
            return invalid("cols", "need at least 2 so odd rows are non-empty");
        }
        if self.min_rows == 0 {
            return invalid("min_rows", "must be at least 1");
        }
        if self.min_rows > self.max_rows {
            return invalid("min_rows", "must not exceed max_rows");
        }
        if self.palette_size == 0 {
            return invalid("palette_size", "must be at least 1");
        }
        if !(self.shot_speed > 0.0) {
            return invalid("shot_speed", "must be positive");
        }
        if self.cannon_speed < 0.0 {
            return invalid("cannon_speed", "must not be negative");
        }
        if self.max_depth == 0 {
            return invalid("max_depth", "must be at least 1");
        }
        if self.min_cluster == 0 {
            return invalid("min_cluster", "must be at least 1");
        }
        Ok(())
    }

    /// Score for clearing a cluster of `size` bubbles
    pub fn cluster_bonus(&self, size: usize) -> u64 {
        let extra = size.saturating_sub(self.min_cluster) as u64;
        self.cluster_base_score + (extra * self.cluster_step_score).min(self.cluster_bonus_cap)
    }

    /// Colors used when generating a level (fewer colors is easier, so the
    /// count shrinks slowly but never drops below 3)
    pub fn level_colors(&self, level: u32) -> u8 {
        let palette = self.palette_size as u32;
        let scaled = palette.saturating_sub(level / 3).max(3);
        scaled.min(palette) as u8
    }

    /// Colors used for rows pushed in by a miss
    pub fn shift_colors(&self, level: u32) -> u8 {
        level
            .saturating_add(2)
            .min(self.palette_size as u32)
            .max(1) as u8
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bubble_clutter_tuning";

    /// Environment variable naming a JSON override file (native only)
    pub const ENV_PATH: &'static str = "BUBBLE_CLUTTER_TUNING";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Load tuning from the file named by `BUBBLE_CLUTTER_TUNING`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_PATH) else {
            return Self::default();
        };

        match Self::load_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
