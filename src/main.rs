//! Turtle Dash demo driver
//!
//! Headless run of the simulation core: activates the waypoint at Home and
//! ticks until the game finishes, logging the outcome. The real front end
//! wires pointer events to `Waypoint::activate` and feeds each frame's
//! `Scene` to its canvas; this driver stands in for both.
//!
//! Usage: turtle-dash [LEVEL] [--dump]

use std::time::{SystemTime, UNIX_EPOCH};

use turtle_dash::Settings;
use turtle_dash::render::render;
use turtle_dash::sim::state::{GamePhase, GameState};
use turtle_dash::sim::tick::{TickInput, tick};

const MAX_TICKS: u64 = 100_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let level: u32 = args
        .iter()
        .find_map(|a| a.parse().ok())
        .unwrap_or(1);
    let dump = args.iter().any(|a| a == "--dump");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let settings = Settings::new(level);
    let mut state = GameState::new(seed, settings);
    log::info!("turtle-dash starting (level {level}, seed {seed})");

    // Scripted input: one pointer press on Home, then let the agents come
    let home = state.home.pos();
    let mut input = TickInput {
        waypoint: Some(home),
    };
    while !state.phase.is_over() && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input);
        input.waypoint = None;
        let _scene = render(&state);
    }

    match state.phase {
        GamePhase::Won => log::info!("You win (tick {})", state.time_ticks),
        GamePhase::Lost => log::info!("You lose (tick {})", state.time_ticks),
        GamePhase::Running => log::warn!("no result after {MAX_TICKS} ticks"),
    }

    if dump {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("state dump failed: {e}"),
        }
    }
}
