//! Browser bindings
//!
//! The page owns the canvas and input listeners; it drives a `WebSession`
//! once per animation frame and draws from the returned events or from a
//! full snapshot.

use wasm_bindgen::prelude::*;

use super::FixedStep;
use crate::aim_toward;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Bubble Clutter starting...");
}

/// One running game, driven from JavaScript
#[wasm_bindgen]
pub struct WebSession {
    state: GameState,
    input: TickInput,
    clock: FixedStep,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session; without a seed the current time is used
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> WebSession {
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        let tuning = Tuning::load();
        log::info!("Session initialized with seed: {}", seed);
        WebSession {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
            clock: FixedStep::new(),
        }
    }

    /// Aim at a pointer position in playfield pixels
    pub fn aim_at(&mut self, x: f32, y: f32) {
        let angle = aim_toward(self.state.cannon.pos(), glam::Vec2::new(x, y));
        self.input.aim = Some(angle);
    }

    pub fn set_aim_angle(&mut self, angle: f32) {
        self.input.aim = Some(angle);
    }

    /// Fire on the next tick (ignored while a shot is in flight)
    pub fn shoot(&mut self) {
        self.input.shoot = true;
    }

    /// -1 left, 0 stop, 1 right
    pub fn set_cannon_dir(&mut self, dir: f32) {
        self.input.cannon_dir = dir;
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Advance by a frame's elapsed seconds; returns the events as a JSON array
    pub fn update(&mut self, dt: f32) -> String {
        let mut events: Vec<GameEvent> = Vec::new();
        for _ in 0..self.clock.advance(dt) {
            let input = self.input.clone();
            events.extend(tick(&mut self.state, &input));

            // Clear one-shot inputs after processing
            self.input.shoot = false;
            self.input.aim = None;
        }
        to_json(&events)
    }

    /// Whole visible state as JSON
    pub fn snapshot(&self) -> String {
        to_json(&self.state.snapshot())
    }

    pub fn score(&self) -> f64 {
        self.state.score as f64
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Replace the tuning, persist it and start over
    pub fn apply_tuning(&mut self, json: &str) -> Result<(), JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        tuning.save();
        self.restart_with(self.state.seed.wrapping_add(1), tuning);
        Ok(())
    }

    pub fn restart(&mut self, seed: f64) {
        let tuning = self.state.tuning.clone();
        self.restart_with(seed as u64, tuning);
    }
}

impl WebSession {
    fn restart_with(&mut self, seed: u64, tuning: Tuning) {
        self.state = GameState::with_tuning(seed, tuning);
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
        self.clock.reset();
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize for JS: {}", e);
            "null".to_string()
        }
    }
}
