//! Declarative draw commands for the view layer
//!
//! The core emits "draw shape S with geometry G and color C" instructions
//! once per entity per tick; the view collaborator consumes them and the
//! core never reads anything back. Building a [`Scene`] is pure: it must
//! not mutate simulation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::state::{Color, Entity, GameState};

/// Nominal player sprite size (the player's hit test is a point, so this is
/// cosmetic only)
pub const PLAYER_DRAW_SIZE: f32 = 20.0;

/// Shape vocabulary of the view layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Filled oval inscribed in the square centered at `center` with edge
    /// `size`
    Oval { center: Vec2, size: f32 },
    /// Axis-aligned rectangle centered at `center`; outline when `filled`
    /// is false
    Rect {
        center: Vec2,
        extent: Vec2,
        filled: bool,
    },
    /// Straight line segment
    Line { from: Vec2, to: Vec2, width: f32 },
}

/// One draw instruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCmd {
    pub shape: Shape,
    pub color: Color,
}

/// Read-only context available while building a frame
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    /// Player position this frame (the bombardier's telegraph line needs it)
    pub player_pos: Vec2,
}

/// The draw list for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub cmds: Vec<DrawCmd>,
}

impl Scene {
    pub fn push(&mut self, shape: Shape, color: Color) {
        self.cmds.push(DrawCmd { shape, color });
    }
}

/// Build the frame's draw list: home, waypoint, agents, player on top
pub fn render(state: &GameState) -> Scene {
    let mut scene = Scene::default();
    let ctx = RenderCtx {
        player_pos: state.player.pos,
    };
    state.home.render(&ctx, &mut scene);
    state.waypoint.render(&ctx, &mut scene);
    for enemy in &state.enemies {
        enemy.render(&ctx, &mut scene);
    }
    state.player.render(&ctx, &mut scene);
    scene
}
