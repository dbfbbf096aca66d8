//! Vector helpers for movement and collision
//!
//! Positions are viewport pixels with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ENTITY_SIZE;

/// A point in viewport pixel coordinates
pub type Position = Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Position, b: Position) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` to `to`.
///
/// Coincident points have no direction; the zero vector is returned so callers
/// degrade to "no movement" instead of propagating NaN.
#[inline]
pub fn direction(from: Position, to: Position) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// True when the centers are strictly closer than `radius`
#[inline]
pub fn within_radius(a: Position, b: Position, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Playable area, fixed at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Position {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a top-left entity position so a 32x32 sprite stays on screen
    pub fn clamp_entity(&self, pos: Position) -> Position {
        let max_x = (self.width - ENTITY_SIZE).max(0.0);
        let max_y = (self.height - ENTITY_SIZE).max(0.0);
        Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }

    /// Strict containment in the viewport grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Position, margin: f32) -> bool {
        pos.x > -margin
            && pos.x < self.width + margin
            && pos.y > -margin
            && pos.y < self.height + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_unit_length() {
        let dir = direction(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_zero_length() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(direction(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_within_radius_is_strict() {
        let a = Vec2::ZERO;
        assert!(within_radius(a, Vec2::new(23.9, 0.0), 24.0));
        assert!(!within_radius(a, Vec2::new(24.0, 0.0), 24.0));
    }

    #[test]
    fn test_clamp_entity() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.clamp_entity(Vec2::new(-5.0, 700.0)), Vec2::new(0.0, 568.0));
        assert_eq!(vp.clamp_entity(Vec2::new(900.0, 10.0)), Vec2::new(768.0, 10.0));
    }

    #[test]
    fn test_contains_with_margin() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.contains_with_margin(Vec2::new(-31.0, 300.0), 32.0));
        assert!(!vp.contains_with_margin(Vec2::new(-32.0, 300.0), 32.0));
        assert!(!vp.contains_with_margin(Vec2::new(400.0, 632.0), 32.0));
        assert!(vp.contains_with_margin(Vec2::new(831.0, 631.0), 32.0));
    }
}
