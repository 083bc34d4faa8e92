//! Turtle Dash - a waypoint-chase arcade game
//!
//! The player token walks toward a pointer-selected waypoint while hostile
//! agents pursue, patrol, or bombard it; reaching Home wins, contact with an
//! agent or an armed bomb loses.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, game state)
//! - `render`: Declarative draw commands for the view layer
//! - `settings`: Validated game configuration

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (frame coordinates: origin top-left, y down)
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_START_X: f32 = 50.0;

    /// Home sits this far in from the right edge, vertically centered
    pub const HOME_MARGIN: f32 = 100.0;
    pub const HOME_SIZE: f32 = 20.0;

    /// Hit-box edge for catalog-spawned agents
    pub const AGENT_SIZE: f32 = 20.0;

    /// Nominal agent speed per level
    pub const SPEED_PER_LEVEL: f32 = 3.0;
    /// Chasers move at a third of nominal speed
    pub const CHASE_SPEED_DIV: f32 = 3.0;
    /// Patrollers move at a quarter of nominal speed
    pub const FENCE_SPEED_DIV: f32 = 4.0;
    /// Patrol rectangle offset outward from Home's edges
    pub const FENCE_GAP: f32 = 20.0;

    /// Skew applied to the random-walk step ranges so net drift alternates
    /// instead of canceling. Intentional jitter, not a bug.
    pub const WALK_SKEW: f32 = 4.0;

    /// Bombardier throw period (ticks)
    pub const THROW_PERIOD: u32 = 20;
    /// Bomb hit-box edge per level
    pub const BOMB_SIZE_PER_LEVEL: f32 = 30.0;
    /// Bomb scatter around the player, per axis
    pub const BOMB_SCATTER_MIN: f32 = -50.0;
    pub const BOMB_SCATTER_MAX: f32 = 51.0;
    /// Fuse tick at which a bomb arms (single hit test)
    pub const BOMB_ARM_TICK: u32 = 20;
    /// Fuse tick at which a bomb self-destructs, hit or miss
    pub const BOMB_EXPIRE_TICK: u32 = 21;

    /// Spawn scheduling, in time units (1 tick = 1 time unit)
    pub const SPAWN_WARMUP: u32 = 100;
    pub const SPAWN_INTERVAL: u32 = 4000;
    /// Forbidden spawn band around the player's start column
    pub const SPAWN_EXCLUSION_MIN: f32 = 40.0;
    pub const SPAWN_EXCLUSION_MAX: f32 = 60.0;
}
