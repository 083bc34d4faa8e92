//! Game configuration
//!
//! Validated at construction: out-of-range values are clamped with a warning
//! rather than propagated into the tick loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::Bounds;

/// Game settings, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty level (>= 1); scales agent speed, bomb size, and spawn rate
    pub level: u32,
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
    /// Player speed (distance per tick)
    pub player_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: 1,
            width: PLAY_WIDTH,
            height: PLAY_HEIGHT,
            player_speed: PLAYER_SPEED,
        }
    }
}

impl Settings {
    /// Create settings for the given level, clamped to valid ranges
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
        .clamped()
    }

    /// Clamp every field to its valid range
    pub fn clamped(mut self) -> Self {
        if self.level < 1 {
            log::warn!("level {} out of range, clamping to 1", self.level);
            self.level = 1;
        }
        if !(self.width > 0.0) || !(self.height > 0.0) {
            log::warn!(
                "play area {}x{} invalid, using {}x{}",
                self.width,
                self.height,
                PLAY_WIDTH,
                PLAY_HEIGHT
            );
            self.width = PLAY_WIDTH;
            self.height = PLAY_HEIGHT;
        }
        if !(self.player_speed > 0.0) {
            log::warn!(
                "player speed {} invalid, using {}",
                self.player_speed,
                PLAYER_SPEED
            );
            self.player_speed = PLAYER_SPEED;
        }
        self
    }

    /// Play area as read-only bounds
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Home center for this play area
    pub fn home_pos(&self) -> Vec2 {
        Vec2::new(self.width - HOME_MARGIN, self.height / 2.0)
    }

    /// Player starting position
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(PLAYER_START_X, self.height / 2.0)
    }

    /// Nominal agent speed at this level
    pub fn agent_speed(&self) -> f32 {
        self.level as f32 * SPEED_PER_LEVEL
    }
}
