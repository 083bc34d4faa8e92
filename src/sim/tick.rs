//! Per-tick orchestration
//!
//! Advances every live entity by one discrete step: player first (it
//! registered first), then the hostile agents in registration order.
//! Entities injected mid-tick join the collection at end of tick, and dead
//! entities are swept there too, so nothing mutates the collection while it
//! is being iterated.

use super::state::{Enemy, Entity, GameState, UpdateCtx};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Activate the waypoint at this point (pointer press)
    pub waypoint: Option<glam::Vec2>,
}

/// Advance the game by one tick.
///
/// A no-op once the game has finished: the global stop suppresses all
/// future updates and scheduled spawns.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase.is_over() {
        return;
    }
    state.time_ticks += 1;

    if let Some(p) = input.waypoint {
        state.waypoint.activate(p.x, p.y);
    }

    let bounds = state.settings.bounds();
    let mut spawned: Vec<Enemy> = Vec::new();

    // Scheduled spawn: the countdown is the scheduler's only timer
    if let Some(agent) =
        state
            .spawner
            .tick(&state.home, bounds, &mut state.rng, &mut state.next_id)
    {
        spawned.push(agent);
    }

    let mut ctx = UpdateCtx {
        bounds,
        level: state.settings.level,
        player_pos: state.player.pos,
        home: &state.home,
        waypoint: &mut state.waypoint,
        rng: &mut state.rng,
        spawned: &mut spawned,
        next_id: &mut state.next_id,
        phase: &mut state.phase,
    };

    state.player.update(&mut ctx);
    // Agents consult the player's position as of its step this tick
    ctx.player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(&mut ctx);
    }
    drop(ctx);

    // Injected entities join now; they take their first step next tick
    state.enemies.append(&mut spawned);
    // Deferred removal keeps in-update self-deletion safe
    state.enemies.retain(|e| e.alive);
}
