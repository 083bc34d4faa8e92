//! Axis-aligned collision test
//!
//! Hostile agents and bombs are square hit-boxes tested against the player's
//! point position. Home has its own inclusive rectangle containment (see
//! [`super::state::Home::contains`]); hazards use the strict test here.

use glam::Vec2;

/// True iff `point` lies strictly inside the square centered at `center`
/// with edge length `size` (half-edge margin on both axes, each axis
/// independently).
#[inline]
pub fn hits(center: Vec2, size: f32, point: Vec2) -> bool {
    let half = size / 2.0;
    (point.x - center.x).abs() < half && (point.y - center.y).abs() < half
}
