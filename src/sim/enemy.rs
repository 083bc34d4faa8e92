//! Hostile agent behavior state machines
//!
//! Each agent re-evaluates its discrete state every tick, takes one
//! kinematic step, then runs the hit test against the player (bombardiers
//! excepted: they never collide, they only throw). State is an explicit
//! [`Behavior`] tag so every machine is inspectable and testable.

use glam::Vec2;
use rand::Rng;

use super::collision::hits;
use super::state::{
    Behavior, ChaseX, ChaseY, Color, Enemy, EnemyKind, Entity, FenceLeg, FenceRect, GamePhase,
    Home, UpdateCtx, WalkDir,
};
use crate::consts::*;
use crate::render::{RenderCtx, Scene, Shape};

/// Fall back to the base speed when given a negative or non-finite one.
/// Agents never move backwards relative to their state machine.
fn checked_speed(speed: f32) -> f32 {
    if speed >= 0.0 && speed.is_finite() {
        speed
    } else {
        log::warn!("agent speed {speed} invalid, using {SPEED_PER_LEVEL}");
        SPEED_PER_LEVEL
    }
}

impl Enemy {
    fn new(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        size: f32,
        speed: f32,
        color: Color,
        behavior: Behavior,
    ) -> Self {
        let size = if size > 0.0 {
            size
        } else {
            log::warn!("{kind:?} size {size} invalid, using {AGENT_SIZE}");
            AGENT_SIZE
        };
        Self {
            id,
            kind,
            pos,
            size,
            speed,
            color,
            behavior,
            alive: true,
        }
    }

    /// Drifts horizontally with skewed random steps, bouncing off the
    /// play-area edges. `speed` is the nominal level-scaled speed.
    pub fn random_walker(id: u32, pos: Vec2, size: f32, speed: f32, color: Color) -> Self {
        // Below this speed the skewed step ranges are empty
        let min_speed = (WALK_SKEW - 1.0) / 2.0;
        let speed = if speed >= min_speed && speed.is_finite() {
            speed
        } else {
            log::warn!("walker speed {speed} invalid, using {SPEED_PER_LEVEL}");
            SPEED_PER_LEVEL
        };
        Self::new(
            id,
            EnemyKind::RandomWalker,
            pos,
            size,
            speed,
            color,
            Behavior::RandomWalk {
                dir: WalkDir::Right,
            },
        )
    }

    /// Homes in on the player one axis at a time, at a third of nominal
    /// speed.
    pub fn chaser(id: u32, pos: Vec2, size: f32, speed: f32, color: Color) -> Self {
        Self::new(
            id,
            EnemyKind::Chaser,
            pos,
            size,
            checked_speed(speed) / CHASE_SPEED_DIV,
            color,
            Behavior::Chase {
                x: ChaseX::Right,
                y: ChaseY::Up,
            },
        )
    }

    /// Circles Home along a rectangle 20 units outside its edges, at a
    /// quarter of nominal speed. The rectangle is fixed at construction.
    pub fn patroller(id: u32, pos: Vec2, size: f32, speed: f32, color: Color, home: &Home) -> Self {
        Self::new(
            id,
            EnemyKind::Patroller,
            pos,
            size,
            checked_speed(speed) / FENCE_SPEED_DIV,
            color,
            Behavior::Fence {
                leg: FenceLeg::Down,
                rect: FenceRect::around(home),
            },
        )
    }

    /// Stationary; lobs a bomb at the player every [`THROW_PERIOD`] ticks
    pub fn bombardier(id: u32, pos: Vec2, size: f32, speed: f32, color: Color) -> Self {
        Self::new(
            id,
            EnemyKind::Bombardier,
            pos,
            size,
            checked_speed(speed),
            color,
            Behavior::Bombard { timer: 0 },
        )
    }

    /// A thrown bomb; arms at fuse tick 20 and expires at 21
    pub fn bomb(id: u32, pos: Vec2, size: f32) -> Self {
        Self::new(
            id,
            EnemyKind::Bomb,
            pos,
            size,
            0.0,
            Color::Grey,
            Behavior::Fuse { timer: 0 },
        )
    }

    /// Whether a bomb is in its armed phase (meaningless for other kinds)
    pub fn armed(&self) -> bool {
        matches!(self.behavior, Behavior::Fuse { timer } if timer >= BOMB_ARM_TICK)
    }

    /// Lose the game if this agent's hit-box contains the player
    fn hit_check(&self, ctx: &mut UpdateCtx) {
        if hits(self.pos, self.size, ctx.player_pos) {
            log::debug!("{:?} {} hit the player", self.kind, self.id);
            ctx.phase.finish(GamePhase::Lost);
        }
    }

    fn walk(&mut self, dir: WalkDir, ctx: &mut UpdateCtx) {
        // Boundary check first, flip without moving; otherwise a skewed
        // random step. The ranges are deliberately asymmetric.
        let dir = match dir {
            WalkDir::Right => {
                if self.pos.x > ctx.bounds.width {
                    WalkDir::Left
                } else {
                    self.pos.x += ctx
                        .rng
                        .random_range(WALK_SKEW - self.speed..=self.speed + 1.0);
                    WalkDir::Right
                }
            }
            WalkDir::Left => {
                if self.pos.x < 0.0 {
                    WalkDir::Right
                } else {
                    self.pos.x += ctx
                        .rng
                        .random_range(-self.speed..=self.speed + 1.0 - WALK_SKEW);
                    WalkDir::Left
                }
            }
        };
        self.behavior = Behavior::RandomWalk { dir };
        self.hit_check(ctx);
    }

    fn chase(&mut self, x: ChaseX, y: ChaseY, ctx: &mut UpdateCtx) {
        // Axes are fully decoupled: each flips on the tick it finds itself
        // past the player, without moving.
        let target = ctx.player_pos;
        let x = match x {
            ChaseX::Right => {
                if self.pos.x > target.x {
                    ChaseX::Left
                } else {
                    self.pos.x += self.speed;
                    ChaseX::Right
                }
            }
            ChaseX::Left => {
                if self.pos.x < target.x {
                    ChaseX::Right
                } else {
                    self.pos.x -= self.speed;
                    ChaseX::Left
                }
            }
        };
        let y = match y {
            ChaseY::Up => {
                if self.pos.y < target.y {
                    ChaseY::Down
                } else {
                    self.pos.y -= self.speed;
                    ChaseY::Up
                }
            }
            ChaseY::Down => {
                if self.pos.y > target.y {
                    ChaseY::Up
                } else {
                    self.pos.y += self.speed;
                    ChaseY::Down
                }
            }
        };
        self.behavior = Behavior::Chase { x, y };
        self.hit_check(ctx);
    }

    fn fence(&mut self, leg: FenceLeg, rect: FenceRect, ctx: &mut UpdateCtx) {
        // down -> right -> up -> left, advancing a leg at each corner
        let leg = match leg {
            FenceLeg::Down => {
                if self.pos.y >= rect.bottom {
                    FenceLeg::Right
                } else {
                    self.pos.y += self.speed;
                    FenceLeg::Down
                }
            }
            FenceLeg::Right => {
                if self.pos.x >= rect.right {
                    FenceLeg::Up
                } else {
                    self.pos.x += self.speed;
                    FenceLeg::Right
                }
            }
            FenceLeg::Up => {
                if self.pos.y <= rect.top {
                    FenceLeg::Left
                } else {
                    self.pos.y -= self.speed;
                    FenceLeg::Up
                }
            }
            FenceLeg::Left => {
                if self.pos.x <= rect.left {
                    FenceLeg::Down
                } else {
                    self.pos.x -= self.speed;
                    FenceLeg::Left
                }
            }
        };
        self.behavior = Behavior::Fence { leg, rect };
        self.hit_check(ctx);
    }

    fn bombard(&mut self, timer: u32, ctx: &mut UpdateCtx) {
        let timer = timer + 1;
        if timer % THROW_PERIOD == 0 {
            let size = ctx.level as f32 * BOMB_SIZE_PER_LEVEL;
            let offset = Vec2::new(
                ctx.rng.random_range(BOMB_SCATTER_MIN..=BOMB_SCATTER_MAX),
                ctx.rng.random_range(BOMB_SCATTER_MIN..=BOMB_SCATTER_MAX),
            );
            let id = ctx.alloc_id();
            let bomb = Enemy::bomb(id, ctx.player_pos + offset, size);
            log::debug!(
                "bombardier {} threw bomb {} at ({:.0}, {:.0})",
                self.id,
                id,
                bomb.pos.x,
                bomb.pos.y
            );
            ctx.spawned.push(bomb);
        }
        self.behavior = Behavior::Bombard { timer };
        // No hit check: a bombardier never collides with the player
    }

    fn fuse(&mut self, timer: u32, ctx: &mut UpdateCtx) {
        let timer = timer + 1;
        if timer == BOMB_ARM_TICK {
            // Armed for exactly this tick: the single hit test
            self.hit_check(ctx);
        }
        if timer >= BOMB_EXPIRE_TICK {
            // Expires whether or not it was ever armed-and-missed
            self.alive = false;
        }
        self.behavior = Behavior::Fuse { timer };
    }
}

impl Entity for Enemy {
    fn update(&mut self, ctx: &mut UpdateCtx) {
        match self.behavior {
            Behavior::RandomWalk { dir } => self.walk(dir, ctx),
            Behavior::Chase { x, y } => self.chase(x, y, ctx),
            Behavior::Fence { leg, rect } => self.fence(leg, rect, ctx),
            Behavior::Bombard { timer } => self.bombard(timer, ctx),
            Behavior::Fuse { timer } => self.fuse(timer, ctx),
        }
    }

    fn render(&self, ctx: &RenderCtx, scene: &mut Scene) {
        match self.behavior {
            Behavior::Bombard { timer } => {
                scene.push(
                    Shape::Rect {
                        center: self.pos,
                        extent: Vec2::splat(self.size),
                        filled: true,
                    },
                    self.color,
                );
                // Telegraph the throw: a line to the player, throw ticks only
                if timer > 0 && timer % THROW_PERIOD == 0 {
                    scene.push(
                        Shape::Line {
                            from: self.pos,
                            to: ctx.player_pos,
                            width: 3.0,
                        },
                        Color::Orange,
                    );
                }
            }
            Behavior::Fuse { .. } => {
                let color = if self.armed() { Color::Red } else { self.color };
                scene.push(
                    Shape::Oval {
                        center: self.pos,
                        size: self.size,
                    },
                    color,
                );
            }
            _ => {
                scene.push(
                    Shape::Oval {
                        center: self.pos,
                        size: self.size,
                    },
                    self.color,
                );
            }
        }
    }

    fn alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bounds, Waypoint};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Run one update with injected capabilities
    fn step(
        enemy: &mut Enemy,
        player_pos: Vec2,
        rng: &mut Pcg32,
        phase: &mut GamePhase,
        spawned: &mut Vec<Enemy>,
    ) {
        let home = Home::new(Vec2::new(700.0, 300.0), 20.0);
        let mut waypoint = Waypoint::default();
        let mut next_id = 1000;
        let mut ctx = UpdateCtx {
            bounds: Bounds::new(800.0, 600.0),
            level: 1,
            player_pos,
            home: &home,
            waypoint: &mut waypoint,
            rng,
            spawned,
            next_id: &mut next_id,
            phase: &mut *phase,
        };
        enemy.update(&mut ctx);
    }

    fn walk_dir(e: &Enemy) -> WalkDir {
        match e.behavior {
            Behavior::RandomWalk { dir } => dir,
            _ => panic!("not a walker"),
        }
    }

    fn fence_leg(e: &Enemy) -> FenceLeg {
        match e.behavior {
            Behavior::Fence { leg, .. } => leg,
            _ => panic!("not a patroller"),
        }
    }

    #[test]
    fn test_walker_flips_at_edges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let far = Vec2::new(-100.0, -100.0);

        let mut e = Enemy::random_walker(1, Vec2::new(801.0, 100.0), 20.0, 3.0, Color::Purple);
        step(&mut e, far, &mut rng, &mut phase, &mut spawned);
        assert_eq!(walk_dir(&e), WalkDir::Left);
        assert_eq!(e.pos.x, 801.0); // flip tick takes no step

        e.pos.x = -1.0;
        step(&mut e, far, &mut rng, &mut phase, &mut spawned);
        assert_eq!(walk_dir(&e), WalkDir::Right);
        assert_eq!(e.pos.x, -1.0);
    }

    proptest! {
        /// At the base speed the skewed ranges are single-signed: x never
        /// decreases while moving right, never increases while moving left.
        #[test]
        fn test_walker_monotone_per_state(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut phase = GamePhase::Running;
            let mut spawned = Vec::new();
            let far = Vec2::new(-500.0, -500.0);
            let mut e =
                Enemy::random_walker(1, Vec2::new(400.0, 100.0), 20.0, 3.0, Color::Purple);

            for _ in 0..600 {
                let dir = walk_dir(&e);
                let before = e.pos.x;
                step(&mut e, far, &mut rng, &mut phase, &mut spawned);
                match dir {
                    WalkDir::Right => prop_assert!(e.pos.x >= before),
                    WalkDir::Left => prop_assert!(e.pos.x <= before),
                }
                // A flip is a no-move tick at a boundary
                if walk_dir(&e) != dir {
                    prop_assert_eq!(e.pos.x, before);
                    prop_assert!(before > 800.0 || before < 0.0);
                }
            }
        }

        /// Spawned walker y never changes: the walk is purely horizontal
        #[test]
        fn test_walker_keeps_row(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut phase = GamePhase::Running;
            let mut spawned = Vec::new();
            let mut e =
                Enemy::random_walker(1, Vec2::new(200.0, 250.0), 20.0, 3.0, Color::Purple);
            for _ in 0..100 {
                step(&mut e, Vec2::new(-500.0, -500.0), &mut rng, &mut phase, &mut spawned);
                prop_assert_eq!(e.pos.y, 250.0);
            }
        }
    }

    #[test]
    fn test_chaser_closes_in_and_catches() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let player = Vec2::new(400.0, 300.0);
        // Nominal speed 3 -> 1 per axis per tick
        let mut e = Enemy::chaser(1, Vec2::new(100.0, 300.0), 20.0, 3.0, Color::Red);
        assert_eq!(e.speed, 1.0);

        for _ in 0..400 {
            let before = (e.pos.x - player.x).abs();
            step(&mut e, player, &mut rng, &mut phase, &mut spawned);
            let after = (e.pos.x - player.x).abs();
            // Monotone approach while still more than one step away
            if before > e.speed {
                assert!(after <= before);
            }
        }
        // Same row, so closing within the half-box on x loses the game
        assert_eq!(phase, GamePhase::Lost);
        assert!((e.pos.x - player.x).abs() <= 1.0 + f32::EPSILON);
    }

    #[test]
    fn test_chaser_flips_without_moving_when_past() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let player = Vec2::new(400.0, 500.0);
        let mut e = Enemy::chaser(1, Vec2::new(405.0, 100.0), 20.0, 3.0, Color::Red);

        step(&mut e, player, &mut rng, &mut phase, &mut spawned);
        match e.behavior {
            Behavior::Chase { x, y } => {
                // Past the player on x: flip, no x movement this tick
                assert_eq!(x, ChaseX::Left);
                assert_eq!(e.pos.x, 405.0);
                // Above the player (y down): up-state flips to down
                assert_eq!(y, ChaseY::Down);
                assert_eq!(e.pos.y, 100.0);
            }
            _ => panic!("not a chaser"),
        }
    }

    #[test]
    fn test_patroller_cycles_and_stays_in_envelope() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let far = Vec2::new(50.0, 50.0);
        let home = Home::new(Vec2::new(700.0, 300.0), 20.0);
        let rect = FenceRect::around(&home);
        // Nominal speed 4 -> 1 per tick; starts at the near-home corner
        let mut e = Enemy::patroller(
            1,
            Vec2::new(rect.left, rect.top),
            20.0,
            4.0,
            Color::Green,
            &home,
        );
        assert_eq!(e.speed, 1.0);

        let mut legs = vec![fence_leg(&e)];
        for _ in 0..1000 {
            step(&mut e, far, &mut rng, &mut phase, &mut spawned);
            assert!(rect.contains(e.pos), "left the ±20 envelope at {:?}", e.pos);
            if fence_leg(&e) != *legs.last().unwrap() {
                legs.push(fence_leg(&e));
            }
        }
        // Fixed cyclic order
        for pair in legs.windows(2) {
            let expected = match pair[0] {
                FenceLeg::Down => FenceLeg::Right,
                FenceLeg::Right => FenceLeg::Up,
                FenceLeg::Up => FenceLeg::Left,
                FenceLeg::Left => FenceLeg::Down,
            };
            assert_eq!(pair[1], expected);
        }
        assert!(legs.len() > 8, "patroller should complete several laps");
        assert_eq!(phase, GamePhase::Running);
    }

    #[test]
    fn test_bombardier_throws_every_20th_tick() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let player = Vec2::new(420.0, 310.0);
        let mut e = Enemy::bombardier(1, Vec2::new(400.0, 300.0), 20.0, 3.0, Color::Black);

        for tick in 1..=60 {
            step(&mut e, player, &mut rng, &mut phase, &mut spawned);
            assert_eq!(spawned.len(), tick / 20, "wrong bomb count at tick {tick}");
        }
        for bomb in &spawned {
            assert_eq!(bomb.kind, EnemyKind::Bomb);
            assert_eq!(bomb.size, BOMB_SIZE_PER_LEVEL); // level 1
            assert!((bomb.pos.x - player.x).abs() <= BOMB_SCATTER_MAX);
            assert!((bomb.pos.y - player.y).abs() <= BOMB_SCATTER_MAX);
        }
        // Stationary thrower
        assert_eq!(e.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_bombardier_never_collides() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let player = Vec2::new(400.0, 300.0);
        // Player standing on top of the bombardier
        let mut e = Enemy::bombardier(1, player, 20.0, 3.0, Color::Black);
        for _ in 0..19 {
            step(&mut e, player, &mut rng, &mut phase, &mut spawned);
        }
        assert_eq!(phase, GamePhase::Running);
    }

    #[test]
    fn test_bomb_arms_at_20_and_hits() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let player = Vec2::new(420.0, 310.0);
        let mut bomb = Enemy::bomb(2, player, 30.0);

        // Dormant: no hit test even sitting on the player
        for _ in 0..19 {
            step(&mut bomb, player, &mut rng, &mut phase, &mut spawned);
            assert!(!bomb.armed());
            assert_eq!(phase, GamePhase::Running);
            assert!(bomb.alive);
        }
        // Fuse tick 20: armed, single hit test
        step(&mut bomb, player, &mut rng, &mut phase, &mut spawned);
        assert!(bomb.armed());
        assert_eq!(phase, GamePhase::Lost);
        assert!(bomb.alive);
    }

    #[test]
    fn test_bomb_expires_at_21_when_missing() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let far = Vec2::new(0.0, 0.0);
        let mut bomb = Enemy::bomb(2, Vec2::new(500.0, 500.0), 30.0);

        for _ in 0..20 {
            step(&mut bomb, far, &mut rng, &mut phase, &mut spawned);
            assert!(bomb.alive);
        }
        // Fuse tick 21: gone, armed-and-missed or not
        step(&mut bomb, far, &mut rng, &mut phase, &mut spawned);
        assert!(!bomb.alive);
        assert_eq!(phase, GamePhase::Running);
    }

    #[test]
    fn test_size_clamped_positive() {
        let e = Enemy::random_walker(1, Vec2::ZERO, -3.0, 3.0, Color::Purple);
        assert!(e.size > 0.0);
    }

    #[test]
    fn test_negative_speed_clamped() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let far = Vec2::new(-500.0, -500.0);

        // A negative-speed walker must not reach the step ranges inverted
        let mut e = Enemy::random_walker(1, Vec2::new(400.0, 100.0), 20.0, -3.0, Color::Purple);
        assert_eq!(e.speed, SPEED_PER_LEVEL);
        for _ in 0..50 {
            step(&mut e, far, &mut rng, &mut phase, &mut spawned);
        }

        // A negative-speed chaser must still approach, not flee
        let player = Vec2::new(400.0, 300.0);
        let mut c = Enemy::chaser(2, Vec2::new(100.0, 300.0), 20.0, -9.0, Color::Red);
        assert_eq!(c.speed, SPEED_PER_LEVEL / CHASE_SPEED_DIV);
        step(&mut c, player, &mut rng, &mut phase, &mut spawned);
        assert!(c.pos.x > 100.0);

        let goal = Home::new(Vec2::new(700.0, 300.0), 20.0);
        let p = Enemy::patroller(3, Vec2::ZERO, 20.0, f32::NAN, Color::Green, &goal);
        assert_eq!(p.speed, SPEED_PER_LEVEL / FENCE_SPEED_DIV);
        let b = Enemy::bombardier(4, Vec2::ZERO, 20.0, f32::INFINITY, Color::Black);
        assert_eq!(b.speed, SPEED_PER_LEVEL);
    }

    #[test]
    fn test_sub_skew_walker_speed_clamped() {
        // Speeds below (WALK_SKEW - 1) / 2 would empty the right-hand
        // step range; they fall back to the base speed instead
        let mut rng = Pcg32::seed_from_u64(17);
        let mut phase = GamePhase::Running;
        let mut spawned = Vec::new();
        let mut e = Enemy::random_walker(1, Vec2::new(400.0, 100.0), 20.0, 1.0, Color::Purple);
        assert_eq!(e.speed, SPEED_PER_LEVEL);
        for _ in 0..50 {
            step(&mut e, Vec2::new(-500.0, -500.0), &mut rng, &mut phase, &mut spawned);
        }
        // The boundary case stays as given
        let min = (WALK_SKEW - 1.0) / 2.0;
        let edge = Enemy::random_walker(2, Vec2::ZERO, 20.0, min, Color::Purple);
        assert_eq!(edge.speed, min);
    }
}
