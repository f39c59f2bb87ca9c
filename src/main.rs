//! Bubble Clutter entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively this runs a headless demo: the cannon plays itself for a number
//! of shots and the session is summarized on exit.
//!
//! Usage: `bubble-clutter [seed] [shots]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_clutter::Tuning;
    use bubble_clutter::platform::FixedStep;
    use bubble_clutter::sim::{GameEvent, GameState, ShotOutcome, TickInput, tick};

    env_logger::init();
    log::info!("Bubble Clutter (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xB0BB1E);
    let shots: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(200);

    let mut state = GameState::with_tuning(seed, Tuning::load());
    log::info!("Session initialized with seed: {}", seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut clock = FixedStep::new();
    let frame = bubble_clutter::consts::SIM_DT;

    let mut resolved = 0u64;
    let mut cleared = 0u64;
    let mut game_overs = 0u32;
    let mut best_level = state.level;

    while resolved < shots {
        for _ in 0..clock.advance(frame) {
            for event in tick(&mut state, &input) {
                match event {
                    GameEvent::ShotResolved { outcome } => {
                        resolved += 1;
                        if matches!(outcome, ShotOutcome::Cleared { .. }) {
                            cleared += 1;
                        }
                    }
                    GameEvent::LevelChanged { level } => best_level = best_level.max(level),
                    GameEvent::GameOver { score, level } => {
                        game_overs += 1;
                        println!("Game over on level {} with {} points", level, score);
                    }
                    _ => {}
                }
            }
        }
    }

    println!(
        "{} shots ({} cleared) over {} ticks: score {}, level {} (best {}), {} game overs",
        resolved,
        cleared,
        state.time_ticks,
        state.score,
        state.level,
        best_level,
        game_overs
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
