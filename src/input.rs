//! Keyboard and pointer input
//!
//! Key events only update the held-key set. Movement is sampled on the input
//! tick, so holding a key moves the player at a fixed rate regardless of the
//! OS key-repeat rate.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::PLAYER_SPEED;
use crate::sim::Command;
use crate::sim::geometry::direction;

/// Movement keys we listen for (DOM `KeyboardEvent.key` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

impl MoveKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(MoveKey::ArrowUp),
            "ArrowDown" => Some(MoveKey::ArrowDown),
            "ArrowLeft" => Some(MoveKey::ArrowLeft),
            "ArrowRight" => Some(MoveKey::ArrowRight),
            "w" => Some(MoveKey::W),
            "a" => Some(MoveKey::A),
            "s" => Some(MoveKey::S),
            "d" => Some(MoveKey::D),
            _ => None,
        }
    }

    pub fn heading(&self) -> Heading {
        match self {
            MoveKey::ArrowUp | MoveKey::W => Heading::Up,
            MoveKey::ArrowDown | MoveKey::S => Heading::Down,
            MoveKey::ArrowLeft | MoveKey::A => Heading::Left,
            MoveKey::ArrowRight | MoveKey::D => Heading::Right,
        }
    }
}

/// Screen direction (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Sampling order within one input tick
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    pub fn offset(&self, speed: f32) -> (f32, f32) {
        match self {
            Heading::Up => (0.0, -speed),
            Heading::Down => (0.0, speed),
            Heading::Left => (-speed, 0.0),
            Heading::Right => (speed, 0.0),
        }
    }
}

/// Held-key state plus pointer translation
#[derive(Debug, Clone, Default)]
pub struct InputController {
    held: HashSet<MoveKey>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one we handle
    pub fn key_down(&mut self, key: &str) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.held.insert(k);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.held.remove(&k);
                true
            }
            None => false,
        }
    }

    /// Release everything (focus loss, teardown)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, heading: Heading) -> bool {
        self.held.iter().any(|k| k.heading() == heading)
    }

    /// One `MovePlayer` per held heading. Headings add up, so diagonals cover
    /// more ground per tick than a single axis.
    pub fn movement_commands(&self) -> Vec<Command> {
        Heading::ALL
            .iter()
            .filter(|h| self.is_held(**h))
            .map(|h| {
                let (dx, dy) = h.offset(PLAYER_SPEED);
                Command::MovePlayer { dx, dy }
            })
            .collect()
    }

    /// Fire toward `click`, aimed from the viewport center. A click exactly on
    /// the center has no direction and fires nothing.
    pub fn fire_command(click: Vec2, viewport_center: Vec2) -> Option<Command> {
        let dir = direction(viewport_center, click);
        if dir == Vec2::ZERO {
            log::debug!("Ignoring click at viewport center");
            return None;
        }
        Some(Command::Fire { direction: dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputController::new();
        assert!(!input.key_down("Enter"));
        assert!(!input.key_down("W"));
        assert!(input.movement_commands().is_empty());
    }

    #[test]
    fn test_held_key_moves_every_sample() {
        let mut input = InputController::new();
        input.key_down("ArrowRight");
        for _ in 0..3 {
            assert_eq!(
                input.movement_commands(),
                vec![Command::MovePlayer { dx: 5.0, dy: 0.0 }]
            );
        }
        input.key_up("ArrowRight");
        assert!(input.movement_commands().is_empty());
    }

    #[test]
    fn test_key_down_twice_does_not_toggle() {
        let mut input = InputController::new();
        input.key_down("a");
        input.key_down("a");
        assert!(input.is_held(Heading::Left));
    }

    #[test]
    fn test_aliases_share_a_heading() {
        let mut input = InputController::new();
        input.key_down("w");
        input.key_down("ArrowUp");
        assert_eq!(input.movement_commands().len(), 1);
        input.key_up("w");
        assert!(input.is_held(Heading::Up));
        input.key_up("ArrowUp");
        assert!(!input.is_held(Heading::Up));
    }

    #[test]
    fn test_diagonal_is_unnormalized() {
        let mut input = InputController::new();
        input.key_down("w");
        input.key_down("d");
        assert_eq!(
            input.movement_commands(),
            vec![
                Command::MovePlayer { dx: 0.0, dy: -5.0 },
                Command::MovePlayer { dx: 5.0, dy: 0.0 },
            ]
        );
    }

    #[test]
    fn test_clear_releases_all() {
        let mut input = InputController::new();
        input.key_down("s");
        input.key_down("ArrowLeft");
        input.clear();
        assert!(input.movement_commands().is_empty());
    }

    #[test]
    fn test_fire_direction_normalized() {
        let center = Vec2::new(400.0, 300.0);
        match InputController::fire_command(Vec2::new(700.0, 700.0), center) {
            Some(Command::Fire { direction }) => {
                assert!((direction.length() - 1.0).abs() < 1e-6);
                assert!((direction.x - 0.6).abs() < 1e-6);
                assert!((direction.y - 0.8).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fire_at_center_is_ignored() {
        let center = Vec2::new(400.0, 300.0);
        assert_eq!(InputController::fire_command(center, center), None);
    }
}
