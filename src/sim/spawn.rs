//! Time-based enemy spawn scheduling
//!
//! A single authoritative "time until next spawn" counter, decremented once
//! per tick by the orchestrator (1 tick = 1 time unit). When it reaches zero
//! the spawner picks a kind from the fixed catalog, places it, and re-arms
//! with a level-dependent delay: spawns accelerate as the level rises.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Bounds, Color, Enemy, EnemyKind, Home};
use crate::consts::*;

/// Where a catalog entry places its agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Just outside Home's bounding square
    NearHome,
    /// Uniformly in the play area, avoiding the player's start column
    RandomInBounds,
}

/// One catalog entry: agent kind plus its placement rule and cosmetic color
#[derive(Debug, Clone, Copy)]
pub struct SpawnSpec {
    pub kind: EnemyKind,
    pub placement: Placement,
    pub color: Color,
}

/// Fixed spawn catalog; one entry is chosen uniformly per firing
pub const CATALOG: [SpawnSpec; 4] = [
    SpawnSpec {
        kind: EnemyKind::RandomWalker,
        placement: Placement::RandomInBounds,
        color: Color::Purple,
    },
    SpawnSpec {
        kind: EnemyKind::Chaser,
        placement: Placement::RandomInBounds,
        color: Color::Red,
    },
    SpawnSpec {
        kind: EnemyKind::Patroller,
        placement: Placement::NearHome,
        color: Color::Green,
    },
    SpawnSpec {
        kind: EnemyKind::Bombardier,
        placement: Placement::RandomInBounds,
        color: Color::Black,
    },
];

/// The spawn scheduler. Holds the game level and the countdown to the next
/// firing; everything else lives in the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    level: u32,
    countdown: u32,
}

impl Spawner {
    /// Scheduler for the given level; first firing after the warm-up delay
    pub fn new(level: u32) -> Self {
        Self::with_warmup(level, SPAWN_WARMUP)
    }

    /// Scheduler with an explicit warm-up delay before the first firing
    pub fn with_warmup(level: u32, warmup: u32) -> Self {
        Self {
            level: level.max(1),
            countdown: warmup,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Time units between firings at this level
    pub fn interval(&self) -> u32 {
        (SPAWN_INTERVAL / self.level).max(1)
    }

    /// Advance one time unit. Returns a newly placed agent when firing;
    /// the countdown re-arms itself, so spawning never stops on its own.
    pub fn tick(
        &mut self,
        home: &Home,
        bounds: Bounds,
        rng: &mut Pcg32,
        next_id: &mut u32,
    ) -> Option<Enemy> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }
        self.countdown = self.interval();
        Some(self.fire(home, bounds, rng, next_id))
    }

    fn fire(&self, home: &Home, bounds: Bounds, rng: &mut Pcg32, next_id: &mut u32) -> Enemy {
        let spec = &CATALOG[rng.random_range(0..CATALOG.len())];
        let pos = match spec.placement {
            Placement::NearHome => place_near_home(home),
            Placement::RandomInBounds => place_random(bounds, rng),
        };
        let id = *next_id;
        *next_id += 1;
        let speed = self.level as f32 * SPEED_PER_LEVEL;
        log::info!(
            "spawned {:?} {} at ({:.0}, {:.0})",
            spec.kind,
            id,
            pos.x,
            pos.y
        );
        match spec.kind {
            EnemyKind::RandomWalker => {
                Enemy::random_walker(id, pos, AGENT_SIZE, speed, spec.color)
            }
            EnemyKind::Chaser => Enemy::chaser(id, pos, AGENT_SIZE, speed, spec.color),
            EnemyKind::Patroller => Enemy::patroller(id, pos, AGENT_SIZE, speed, spec.color, home),
            EnemyKind::Bombardier => Enemy::bombardier(id, pos, AGENT_SIZE, speed, spec.color),
            // Bombs are thrown by bombardiers, never spawned from the catalog
            EnemyKind::Bomb => Enemy::bomb(id, pos, AGENT_SIZE),
        }
    }
}

/// The corner of the patrol rectangle: offset 20 beyond Home's edge on both
/// axes.
fn place_near_home(home: &Home) -> Vec2 {
    let off = home.size() / 2.0 + FENCE_GAP;
    Vec2::new(home.pos().x - off, home.pos().y - off)
}

/// Uniform point in the play area, re-rolling x while it lands in the
/// forbidden band around the player's start column.
fn place_random(bounds: Bounds, rng: &mut Pcg32) -> Vec2 {
    let mut x = rng.random_range(0.0..=bounds.width);
    while x > SPAWN_EXCLUSION_MIN && x < SPAWN_EXCLUSION_MAX {
        x = rng.random_range(0.0..=bounds.width);
    }
    let y = rng.random_range(0.0..=bounds.height);
    Vec2::new(x, y)
}
