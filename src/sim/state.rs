//! Game state and core simulation types
//!
//! Everything that must be persisted for determinism lives here. Behavior
//! logic for the hostile agents is in [`super::enemy`]; this module defines
//! the entity types, the lifecycle contract, and the orchestrator state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::Spawner;
use crate::consts::*;
use crate::render::{RenderCtx, Scene, Shape};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation is advancing
    Running,
    /// Player reached Home
    Won,
    /// Player touched a hostile agent or an armed bomb
    Lost,
}

impl GamePhase {
    /// Latch a terminal phase. The first report is authoritative; later
    /// reports in the same or subsequent ticks are no-ops.
    pub fn finish(&mut self, terminal: GamePhase) {
        if matches!(self, GamePhase::Running) && terminal != GamePhase::Running {
            log::info!("game over: {terminal:?}");
            *self = terminal;
        }
    }

    /// Whether the game has reached a terminal phase
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Running)
    }
}

/// Read-only play-area dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Cosmetic color tag carried by draw commands. Not simulation-relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Green,
    Brown,
    Purple,
    Red,
    Black,
    Grey,
    Orange,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Brown => "brown",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::Black => "black",
            Color::Grey => "grey",
            Color::Orange => "orange",
        }
    }
}

/// Read-only capabilities plus terminal notifiers handed to every entity on
/// update. Entities hold no back-reference to the game; whatever they need
/// arrives here.
pub struct UpdateCtx<'a> {
    /// Play area dimensions
    pub bounds: Bounds,
    /// Game level
    pub level: u32,
    /// Player position at the start of this tick
    pub player_pos: Vec2,
    /// Goal region geometry
    pub home: &'a Home,
    /// The player's movement target (mutated only by the player's update)
    pub waypoint: &'a mut Waypoint,
    /// Seeded simulation RNG
    pub rng: &'a mut Pcg32,
    /// Entities injected during this tick, registered at end of tick
    pub spawned: &'a mut Vec<Enemy>,
    /// Entity id allocator
    pub next_id: &'a mut u32,
    /// Terminal-condition latch (first win/lose report wins)
    pub phase: &'a mut GamePhase,
}

impl UpdateCtx<'_> {
    /// Allocate a fresh entity id
    pub fn alloc_id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }
}

/// Uniform lifecycle every simulated object satisfies.
///
/// Creation is construction plus registration with the orchestrator;
/// `update` advances exactly one tick; `render` reflects current state into
/// the view layer and must not mutate simulation state. Destruction clears
/// the liveness flag and the orchestrator sweeps dead entities at end of
/// tick, so self-removal during `update` never corrupts the collection
/// being iterated (and clearing the flag twice is a no-op).
pub trait Entity {
    /// Advance state by exactly one tick. Fixed scenery (Home, the
    /// waypoint) has nothing to advance and keeps this default; the
    /// orchestrator skips such entities in its update loop.
    fn update(&mut self, _ctx: &mut UpdateCtx) {}
    /// Emit draw commands for the current state
    fn render(&self, ctx: &RenderCtx, scene: &mut Scene);
    /// Whether the entity survives the end-of-tick sweep
    fn alive(&self) -> bool {
        true
    }
}

/// The player's current movement target. At most one active target exists;
/// it deactivates automatically once the player gets within one step of it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Waypoint {
    target: Option<Vec2>,
}

impl Waypoint {
    /// Activate the waypoint at the given point (pointer press)
    pub fn activate(&mut self, x: f32, y: f32) {
        self.target = Some(Vec2::new(x, y));
    }

    /// Mark the waypoint inactive
    pub fn deactivate(&mut self) {
        self.target = None;
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }
}

// a waypoint is fixed; the player deactivates it on arrival
impl Entity for Waypoint {
    fn render(&self, _ctx: &RenderCtx, scene: &mut Scene) {
        if let Some(t) = self.target {
            let arm = 10.0;
            scene.push(
                Shape::Line {
                    from: Vec2::new(t.x - arm, t.y - arm),
                    to: Vec2::new(t.x + arm, t.y + arm),
                    width: 2.0,
                },
                Color::Green,
            );
            scene.push(
                Shape::Line {
                    from: Vec2::new(t.x - arm, t.y + arm),
                    to: Vec2::new(t.x + arm, t.y - arm),
                    width: 2.0,
                },
                Color::Green,
            );
        }
    }
}

/// The goal region: a fixed axis-aligned square. Immutable after
/// construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Home {
    pos: Vec2,
    size: f32,
}

impl Home {
    /// Create the goal region; a non-positive size is clamped
    pub fn new(pos: Vec2, size: f32) -> Self {
        let size = if size > 0.0 {
            size
        } else {
            log::warn!("home size {size} invalid, using {HOME_SIZE}");
            HOME_SIZE
        };
        Self { pos, size }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Rectangle containment with inclusive bounds: Home is a destination,
    /// not a hazard.
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point.x - self.pos.x).abs() <= half && (point.y - self.pos.y).abs() <= half
    }
}

// home never moves
impl Entity for Home {
    fn render(&self, _ctx: &RenderCtx, scene: &mut Scene) {
        scene.push(
            Shape::Rect {
                center: self.pos,
                extent: Vec2::splat(self.size),
                filled: false,
            },
            Color::Brown,
        );
    }
}

/// The player token. No internal state beyond position: each tick its
/// motion is fully determined by the waypoint and its position relative to
/// Home.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Distance covered per tick
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        let speed = if speed > 0.0 {
            speed
        } else {
            log::warn!("player speed {speed} invalid, using {PLAYER_SPEED}");
            PLAYER_SPEED
        };
        Self { pos, speed }
    }
}

impl Entity for Player {
    fn update(&mut self, ctx: &mut UpdateCtx) {
        // Arrival check is unconditional: it does not depend on the waypoint
        if ctx.home.contains(self.pos) {
            ctx.phase.finish(GamePhase::Won);
        }

        if let Some(target) = ctx.waypoint.target() {
            // Heading is recomputed fresh every tick: direct pursuit of a
            // possibly-repositioned target, no steering delay
            let heading = (target - self.pos).normalize_or_zero();
            self.pos += heading * self.speed;
            // "Close enough" arrival
            if self.pos.distance(target) < self.speed {
                ctx.waypoint.deactivate();
            }
        }
    }

    fn render(&self, _ctx: &RenderCtx, scene: &mut Scene) {
        scene.push(
            Shape::Oval {
                center: self.pos,
                size: crate::render::PLAYER_DRAW_SIZE,
            },
            Color::Green,
        );
    }
}

/// Hostile agent kinds. The first four are spawned from the catalog; bombs
/// are injected by bombardiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    RandomWalker,
    Chaser,
    Patroller,
    Bombardier,
    Bomb,
}

/// Random walker horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkDir {
    Left,
    Right,
}

/// Chaser x-axis state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseX {
    Left,
    Right,
}

/// Chaser y-axis state (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseY {
    Up,
    Down,
}

/// Patrol leg, visited in the fixed cycle down -> right -> up -> left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FenceLeg {
    Down,
    Right,
    Up,
    Left,
}

/// Patrol rectangle: Home's bounds inflated by [`FENCE_GAP`] on every side.
/// Computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FenceRect {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl FenceRect {
    pub fn around(home: &Home) -> Self {
        let off = home.size() / 2.0 + FENCE_GAP;
        Self {
            top: home.pos().y - off,
            bottom: home.pos().y + off,
            left: home.pos().x - off,
            right: home.pos().x + off,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Per-kind discrete state: an explicit tag, not a callable field, so the
/// state machines stay inspectable and testable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Drift left/right across the play area with skewed random steps
    RandomWalk { dir: WalkDir },
    /// Two independent per-axis 2-state machines; diagonal motion emerges
    /// from per-axis correction, not a combined heading
    Chase { x: ChaseX, y: ChaseY },
    /// Walk the fixed rectangle around Home
    Fence { leg: FenceLeg, rect: FenceRect },
    /// Stationary; throws a bomb at the player every [`THROW_PERIOD`] ticks
    Bombard { timer: u32 },
    /// Bomb fuse: dormant, then armed for one tick, then gone
    Fuse { timer: u32 },
}

/// A hostile agent (or bomb) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Square hit-box edge length (> 0)
    pub size: f32,
    /// Scalar speed per tick (already divided for chasers/patrollers)
    pub speed: f32,
    /// Cosmetic only
    pub color: Color,
    pub behavior: Behavior,
    /// Cleared on self-removal; swept at end of tick
    pub alive: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; the only source of randomness in the simulation
    pub rng: Pcg32,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub waypoint: Waypoint,
    pub home: Home,
    pub player: Player,
    /// All hostile agents and bombs, in registration order
    pub enemies: Vec<Enemy>,
    pub spawner: Spawner,
    pub(crate) next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and settings
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.clamped();
        let home = Home::new(settings.home_pos(), HOME_SIZE);
        let player = Player::new(settings.player_start(), settings.player_speed);
        log::info!("new game: level {} seed {}", settings.level, seed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            time_ticks: 0,
            phase: GamePhase::Running,
            waypoint: Waypoint::default(),
            home,
            player,
            enemies: Vec::new(),
            spawner: Spawner::new(settings.level),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register an enemy with the orchestrator
    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Outward win signal: idempotent, first occurrence wins
    pub fn game_over_win(&mut self) {
        self.phase.finish(GamePhase::Won);
    }

    /// Outward lose signal: idempotent, first occurrence wins
    pub fn game_over_lose(&mut self) {
        self.phase.finish(GamePhase::Lost);
    }
}
