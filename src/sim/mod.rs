//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete tick at a time, no wall-clock reads
//! - Seeded RNG only (a run is a function of seed + input trace)
//! - Stable iteration order (entity registration order)
//! - No rendering or platform dependencies
pub mod collision;
pub mod enemy;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::hits;
pub use spawn::{CATALOG, Placement, SpawnSpec, Spawner};
pub use state::{
    Behavior, Bounds, ChaseX, ChaseY, Color, Enemy, EnemyKind, Entity, FenceLeg, FenceRect,
    GamePhase, GameState, Home, Player, UpdateCtx, WalkDir, Waypoint,
};
pub use tick::{TickInput, tick};
