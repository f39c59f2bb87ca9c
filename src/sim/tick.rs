//! Fixed-step simulation tick
//!
//! Core game loop: applies one tick of input, moves the projectile and
//! resolves at most one shot. Everything the renderer needs to know comes
//! back as an ordered list of `GameEvent`s.

use rand::Rng;

use super::cluster::{Resolution, resolve_placement};
use super::collision::{bounce_off_side_walls, exited_bottom, first_overlap, reached_top};
use super::error::SimError;
use super::geometry::GridPos;
use super::placement::find_nearest_free_cell;
use super::state::{GameEvent, GameState, Projectile, ShotOutcome};

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New aim angle (from pointer position)
    pub aim: Option<f32>,
    /// Fire (click/tap/space); ignored while a shot is in flight
    pub shoot: bool,
    /// Cannon slide direction, -1 (left) to 1 (right)
    pub cannon_dir: f32,
    /// Idle/demo mode - the cannon sweeps and fires by itself
    pub idle_mode: bool,
}

impl TickInput {
    /// Aim and fire in one go
    pub fn shot(angle: f32) -> Self {
        Self {
            aim: Some(angle),
            shoot: true,
            ..Default::default()
        }
    }
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.idle_mode {
        // Sweep across most of the upper half-plane
        let t = state.time_ticks as f32 * 0.03;
        input.aim = Some(-std::f32::consts::FRAC_PI_2 + t.sin() * 1.2);
        input.shoot = !state.in_flight();
    }
    let input = &input;

    // A shot request while one is flying is ignored, aim included
    let rejected_shot = input.shoot && state.in_flight();
    if let Some(angle) = input.aim.filter(|_| !rejected_shot) {
        state.set_aim_angle(angle);
    }

    if input.cannon_dir != 0.0 {
        let dx = input.cannon_dir.clamp(-1.0, 1.0) * state.tuning.cannon_speed;
        state.cannon.slide(dx, &state.tuning);
    }

    if input.shoot {
        match state.spawn_projectile() {
            Some(shot) => events.push(GameEvent::ShotFired {
                color: shot.color,
                pos: shot.pos,
                vel: shot.vel,
            }),
            None => log::debug!("Shot requested while one is in flight; ignored"),
        }
    }

    advance_projectile(state, &mut events);
    events
}

/// Move the projectile one step and resolve it if it stuck or left
fn advance_projectile(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(mut shot) = state.projectile.take() else {
        return;
    };

    let radius = state.tuning.bubble_radius;
    let bounce = bounce_off_side_walls(shot.pos + shot.vel, shot.vel, radius, state.tuning.width);
    shot.pos = bounce.pos;
    shot.vel = bounce.vel;

    let layout = *state.board.layout();
    if let Some(hit) = first_overlap(&state.board, shot.pos) {
        // The struck bubble is the most reliable anchor for the search
        log::debug!("Projectile hit bubble at {:?}", hit);
        place_shot(state, shot, hit, events);
    } else if reached_top(shot.pos, &layout) {
        let mut seed = layout.pixel_to_grid(shot.pos);
        seed.row = seed.row.max(0);
        log::debug!("Projectile reached the top, seeding search at {:?}", seed);
        place_shot(state, shot, seed, events);
    } else if exited_bottom(shot.pos, radius, state.tuning.height) {
        log::info!("Projectile left the playfield");
        state.score = state.score.saturating_sub(state.tuning.miss_penalty);
        events.push(GameEvent::ScoreChanged { score: state.score });
        events.push(GameEvent::ShotResolved {
            outcome: ShotOutcome::Exited,
        });
        shift_rows(state, events);
    } else {
        state.projectile = Some(shot);
    }
}

/// Snap a stuck projectile onto the board and run the cluster check
fn place_shot(state: &mut GameState, shot: Projectile, seed: GridPos, events: &mut Vec<GameEvent>) {
    let max_depth = state.tuning.max_depth;
    let Some(cell) = find_nearest_free_cell(&state.board, shot.pos, seed, max_depth) else {
        let err = SimError::NoFreeCellFound { seed, max_depth };
        log::warn!("Shot lost: {}", err);
        events.push(GameEvent::ShotResolved {
            outcome: ShotOutcome::Lost,
        });
        shift_rows(state, events);
        return;
    };

    if let Err(err) = state.board.set(cell, shot.color) {
        log::error!("Shot discarded: {}", err);
        events.push(GameEvent::ShotResolved {
            outcome: ShotOutcome::Discarded,
        });
        return;
    }
    log::debug!("Placed color {} at {:?}", shot.color, cell);
    events.push(state.place_event(cell, shot.color));

    match resolve_placement(&mut state.board, cell, &state.tuning) {
        Resolution::Cleared { removed, bonus } => {
            state.score += bonus;
            let count = removed.len();
            events.push(GameEvent::RemoveBubbles { cells: removed });
            events.push(GameEvent::ScoreChanged { score: state.score });
            events.push(GameEvent::ShotResolved {
                outcome: ShotOutcome::Cleared {
                    cell,
                    removed: count,
                    bonus,
                },
            });
        }
        Resolution::Unmatched { size } => {
            log::debug!("Cluster of {} too small; adding a row", size);
            events.push(GameEvent::ShotResolved {
                outcome: ShotOutcome::Placed { cell },
            });
            shift_rows(state, events);
        }
    }

    check_level_complete(state, events);
}

/// Miss penalty: push a new row in from the top, or end the session if full
fn shift_rows(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let colors = state.tuning.shift_colors(state.level);
    match state.board.shift_down(colors, &mut state.rng) {
        Ok(dropped) => {
            if !dropped.is_empty() {
                log::debug!("{} bubbles fell off the row end during shift", dropped.len());
            }
            events.push(GameEvent::RowsShifted { dropped });
            let top: Vec<_> = state
                .board
                .active_cells()
                .take_while(|(pos, _)| pos.row == 0)
                .collect();
            for (pos, cell) in top {
                events.push(state.place_event(pos, cell.color));
            }
        }
        Err(err) => {
            log::warn!("{}", err);
            game_over(state, events);
        }
    }
}

/// Award the level bonus and build the next board once everything is gone
fn check_level_complete(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.board.is_cleared() {
        return;
    }

    state.score += state.level as u64 * state.tuning.level_bonus;
    state.level += 1;
    log::info!("Level cleared! Now level {} with score {}", state.level, state.score);
    events.push(GameEvent::ScoreChanged { score: state.score });
    events.push(GameEvent::LevelChanged { level: state.level });
    events.extend(start_level(state));
}

/// Board full: report, then rebuild the board for the same level
///
/// Score and level carry over.
fn game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    log::info!("Game over - board full! Score {} on level {}", state.score, state.level);
    events.push(GameEvent::GameOver {
        score: state.score,
        level: state.level,
    });

    state.projectile = None;
    events.extend(start_level(state));
}

/// Generate the board for the current level
///
/// Row count is random within the tuning range; the palette shrinks as the
/// level rises.
pub fn start_level(state: &mut GameState) -> Vec<GameEvent> {
    let tuning = &state.tuning;
    let rows = state.rng.random_range(tuning.min_rows..=tuning.max_rows) as usize;
    let colors = tuning.level_colors(state.level);

    state.board.regenerate(rows, colors, &mut state.rng);
    log::info!(
        "Level {}: {} rows, {} colors, {} bubbles",
        state.level,
        rows,
        colors,
        state.board.active_count()
    );

    let mut events = vec![GameEvent::BoardReset { rows }];
    events.extend(
        state
            .board
            .active_cells()
            .map(|(pos, cell)| state.place_event(pos, cell.color)),
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    const RED: u8 = 0;
    const GREEN: u8 = 1;
    const BLUE: u8 = 2;

    fn empty_state() -> GameState {
        GameState::empty(12345, Tuning::default())
    }

    /// Put a projectile of `color` right where it will hit on the next tick
    fn aim_projectile(state: &mut GameState, pos: Vec2, color: u8) {
        state.projectile = Some(Projectile {
            pos,
            vel: Vec2::new(0.0, -1.0),
            color,
        });
    }

    fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    fn outcome(events: &[GameEvent]) -> Option<&ShotOutcome> {
        events.iter().find_map(|e| match e {
            GameEvent::ShotResolved { outcome } => Some(outcome),
            _ => None,
        })
    }

    #[test]
    fn test_shoot_spawns_and_moves() {
        let mut state = empty_state();
        let events = tick(&mut state, &TickInput::shot(-FRAC_PI_2));
        assert!(matches!(events[0], GameEvent::ShotFired { .. }));
        let shot = state.projectile.unwrap();
        // Spawned at the cannon and advanced one step
        assert!((shot.pos.y - 570.0).abs() < 1e-3);
        assert!((shot.pos.x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_second_shot_while_flying_is_noop() {
        let mut state = empty_state();
        tick(&mut state, &TickInput::shot(-FRAC_PI_2));
        let before = state.projectile.unwrap();
        let events = tick(&mut state, &TickInput::shot(-0.3));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ShotFired { .. })), 0);
        assert_eq!(state.shots_fired, 1);
        assert_eq!(state.projectile.unwrap().vel, before.vel);
    }

    #[test]
    fn test_side_wall_reflects() {
        let mut state = empty_state();
        state.projectile = Some(Projectile {
            pos: Vec2::new(25.0, 400.0),
            vel: Vec2::new(-8.0, -6.0),
            color: RED,
        });
        tick(&mut state, &TickInput::default());
        let shot = state.projectile.unwrap();
        assert_eq!(shot.pos.x, 20.0);
        assert_eq!(shot.vel.x, 8.0);
    }

    #[test]
    fn test_three_cluster_scores_ten() {
        let mut state = empty_state();
        state.board.set(GridPos::new(0, 0), RED).unwrap();
        state.board.set(GridPos::new(0, 1), RED).unwrap();
        // Something else so the level does not complete
        state.board.set(GridPos::new(0, 10), GREEN).unwrap();

        // Just below (0,0)/(0,1): snaps into (1,0)
        aim_projectile(&mut state, Vec2::new(41.0, 80.0), RED);
        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 10);
        assert_eq!(
            outcome(&events),
            Some(&ShotOutcome::Cleared {
                cell: GridPos::new(1, 0),
                removed: 3,
                bonus: 10
            })
        );
        assert!(events.contains(&GameEvent::RemoveBubbles {
            cells: vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 0)]
        }));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::RowsShifted { .. })), 0);
        assert_eq!(state.board.active_count(), 1);
        assert!(!state.in_flight());
    }

    #[test]
    fn test_bigger_cluster_bonus() {
        let mut state = empty_state();
        for col in 0..5 {
            state.board.set(GridPos::new(0, col), RED).unwrap();
        }
        state.board.set(GridPos::new(0, 10), GREEN).unwrap();

        aim_projectile(&mut state, Vec2::new(41.0, 80.0), RED);
        tick(&mut state, &TickInput::default());
        // 6 bubbles: 10 + 3 * 5
        assert_eq!(state.score, 25);
    }

    #[test]
    fn test_miss_shifts_exactly_once() {
        let mut state = empty_state();
        state.board.set(GridPos::new(0, 0), GREEN).unwrap();
        state.board.set(GridPos::new(0, 1), BLUE).unwrap();
        state.score = 40;

        aim_projectile(&mut state, Vec2::new(41.0, 80.0), RED);
        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 40);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::RowsShifted { .. })), 1);
        assert_eq!(
            outcome(&events),
            Some(&ShotOutcome::Placed {
                cell: GridPos::new(1, 0)
            })
        );
        // Old rows moved down; the placed red is now at (2,0)
        assert_eq!(state.board.row_count(), 3);
        assert_eq!(state.board.active_color(GridPos::new(1, 0)), Some(GREEN));
        assert_eq!(state.board.active_color(GridPos::new(2, 0)), Some(RED));
        // Full new top row announced
        let placed_top = count(&events, |e| {
            matches!(e, GameEvent::PlaceBubble { cell, .. } if cell.row == 0)
        });
        assert_eq!(placed_top, 20);
    }

    #[test]
    fn test_top_reach_on_empty_board() {
        let mut state = empty_state();
        // Empty board: no bubble to hit, so the top band catches it
        aim_projectile(&mut state, Vec2::new(401.0, 71.0), BLUE);
        let events = tick(&mut state, &TickInput::default());

        let placed = events.iter().find_map(|e| match e {
            GameEvent::PlaceBubble { cell, color, .. } => Some((*cell, *color)),
            _ => None,
        });
        // The loose pixel seed lands on (2,13); the closest free center to
        // the impact point is the odd-row cell (1,9)
        assert_eq!(placed, Some((GridPos::new(1, 9), BLUE)));
        assert_eq!(
            outcome(&events),
            Some(&ShotOutcome::Placed {
                cell: GridPos::new(1, 9)
            })
        );
    }

    #[test]
    fn test_exit_bottom_penalty_and_shift() {
        let mut state = empty_state();
        state.board.set(GridPos::new(0, 3), GREEN).unwrap();
        state.score = 30;
        state.projectile = Some(Projectile {
            pos: Vec2::new(400.0, 615.0),
            vel: Vec2::new(0.0, 10.0),
            color: RED,
        });

        let events = tick(&mut state, &TickInput::default());
        // Penalty floors at zero
        assert_eq!(state.score, 0);
        assert_eq!(outcome(&events), Some(&ShotOutcome::Exited));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::RowsShifted { .. })), 1);
        assert_eq!(state.board.active_color(GridPos::new(1, 3)), Some(GREEN));
        assert!(!state.in_flight());
    }

    #[test]
    fn test_lost_shot_shifts_rows() {
        let tuning = Tuning {
            max_depth: 1,
            ..Default::default()
        };
        let mut state = GameState::empty(5, tuning);
        // Enclose (2,5) completely so a depth-1 search has nowhere to go
        let hit = GridPos::new(2, 5);
        state.board.set(hit, GREEN).unwrap();
        for n in crate::sim::hex::neighbor_candidates(hit) {
            state.board.set(n, BLUE).unwrap();
        }
        let rows_before = state.board.row_count();
        let center = state.board.layout().cell_center(hit);
        aim_projectile(&mut state, center + Vec2::new(0.0, 1.0), RED);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(outcome(&events), Some(&ShotOutcome::Lost));
        assert_eq!(state.board.row_count(), rows_before + 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlaceBubble { cell, .. } if cell.row != 0)), 0);
    }

    #[test]
    fn test_clearing_board_advances_level() {
        let mut state = empty_state();
        state.board.set(GridPos::new(0, 0), RED).unwrap();
        state.board.set(GridPos::new(0, 1), RED).unwrap();

        aim_projectile(&mut state, Vec2::new(41.0, 80.0), RED);
        let events = tick(&mut state, &TickInput::default());

        // 10 for the cluster + 100 for level 1
        assert_eq!(state.score, 110);
        assert_eq!(state.level, 2);
        assert!(events.contains(&GameEvent::LevelChanged { level: 2 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::BoardReset { .. })));
        assert!(!state.board.is_cleared());
        assert!(state.bubbles().iter().all(|b| b.color < 6));
    }

    #[test]
    fn test_board_full_ends_session() {
        let mut state = empty_state();
        let ceiling = state.board.row_ceiling();
        let mut rng = state.rng.clone();
        state.board.regenerate(ceiling, 3, &mut rng);
        state.score = 500;
        state.level = 4;
        state.projectile = Some(Projectile {
            pos: Vec2::new(400.0, 615.0),
            vel: Vec2::new(0.0, 10.0),
            color: RED,
        });

        // The miss penalty applies, then the shift overflows
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::GameOver {
            score: 450,
            level: 4
        }));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::RowsShifted { .. })), 0);
        // Same level and score on a fresh board
        assert_eq!((state.level, state.score), (4, 450));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::LevelChanged { .. })), 0);
        assert!((3..=7).contains(&state.board.row_count()));
        assert!(events.iter().any(|e| matches!(e, GameEvent::BoardReset { .. })));
    }

    #[test]
    fn test_aim_ignored_with_rejected_shot() {
        let mut state = empty_state();
        tick(&mut state, &TickInput::shot(-1.0));
        assert_eq!(state.cannon.aim, -1.0);

        // Second shot while flying: neither fires nor re-aims
        tick(&mut state, &TickInput::shot(-2.0));
        assert_eq!(state.cannon.aim, -1.0);

        // Plain aim updates still apply mid-flight
        let aim_only = TickInput {
            aim: Some(-2.0),
            ..Default::default()
        };
        tick(&mut state, &aim_only);
        assert_eq!(state.cannon.aim, -2.0);
    }

    #[test]
    fn test_cannon_moves_with_input() {
        let mut state = empty_state();
        let start = state.cannon.x;
        let input = TickInput {
            cannon_dir: 1.0,
            ..Default::default()
        };
        tick(&mut state, &input);
        tick(&mut state, &input);
        assert_eq!(state.cannon.x, start + 20.0);
    }

    #[test]
    fn test_idle_mode_fires() {
        let mut state = GameState::new(77);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input);
        assert!(matches!(events[0], GameEvent::ShotFired { .. }));
        for _ in 0..2000 {
            tick(&mut state, &input);
        }
        assert!(state.shots_fired > 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput::shot(-1.2),
            TickInput::default(),
            TickInput {
                cannon_dir: -1.0,
                ..Default::default()
            },
            TickInput::shot(-2.0),
        ];

        for _ in 0..200 {
            for input in &inputs {
                let e1 = tick(&mut state1, input);
                let e2 = tick(&mut state2, input);
                assert_eq!(e1, e2);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.board, state2.board);
    }
}
