//! Entity construction
//!
//! All randomness comes through the injected RNG so a seeded store spawns the
//! same enemies in the same places.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Position, Viewport};
use super::state::{Enemy, EnemyKind, EntityId, Projectile};
use crate::consts::*;

/// Viewport edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Point just outside `edge`, uniformly placed along it
pub fn edge_position(viewport: &Viewport, edge: Edge, t: f32) -> Position {
    match edge {
        Edge::Top => Vec2::new(t * viewport.width, -SPAWN_MARGIN),
        Edge::Right => Vec2::new(viewport.width + SPAWN_MARGIN, t * viewport.height),
        Edge::Bottom => Vec2::new(t * viewport.width, viewport.height + SPAWN_MARGIN),
        Edge::Left => Vec2::new(-SPAWN_MARGIN, t * viewport.height),
    }
}

/// Pick a random edge and a random point along it
pub fn spawn_position(viewport: &Viewport, rng: &mut impl Rng) -> Position {
    let edge = Edge::random(rng);
    let t: f32 = rng.random();
    edge_position(viewport, edge, t)
}

/// Fast with probability `FAST_ENEMY_CHANCE`, basic otherwise. Bosses are
/// never rolled here.
pub fn roll_enemy_kind(rng: &mut impl Rng) -> EnemyKind {
    if rng.random_bool(FAST_ENEMY_CHANCE) {
        EnemyKind::Fast
    } else {
        EnemyKind::Basic
    }
}

pub fn create_enemy(id: EntityId, pos: Position, rng: &mut impl Rng) -> Enemy {
    Enemy {
        id,
        pos,
        health: ENEMY_START_HEALTH,
        kind: roll_enemy_kind(rng),
    }
}

/// `direction` must already be unit length
pub fn create_projectile(id: EntityId, pos: Position, direction: Vec2) -> Projectile {
    Projectile {
        id,
        pos,
        direction,
        damage: PROJECTILE_DAMAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_edge_positions_sit_outside_viewport() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(edge_position(&vp, Edge::Top, 0.5), Vec2::new(400.0, -32.0));
        assert_eq!(edge_position(&vp, Edge::Right, 0.5), Vec2::new(832.0, 300.0));
        assert_eq!(edge_position(&vp, Edge::Bottom, 0.0), Vec2::new(0.0, 632.0));
        assert_eq!(edge_position(&vp, Edge::Left, 1.0), Vec2::new(-32.0, 600.0));
    }

    #[test]
    fn test_spawn_position_always_on_an_edge() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let p = spawn_position(&vp, &mut rng);
            let on_edge = p.y == -32.0 || p.x == 832.0 || p.y == 632.0 || p.x == -32.0;
            assert!(on_edge, "spawned off-edge at {p:?}");
        }
    }

    #[test]
    fn test_create_enemy_defaults() {
        let mut rng = Pcg32::seed_from_u64(1);
        let enemy = create_enemy(EntityId(3), Vec2::new(1.0, 2.0), &mut rng);
        assert_eq!(enemy.id, EntityId(3));
        assert_eq!(enemy.health, 100);
        assert_ne!(enemy.kind, EnemyKind::Boss);
    }

    #[test]
    fn test_fast_ratio_roughly_one_in_five() {
        let mut rng = Pcg32::seed_from_u64(42);
        let fast = (0..10_000)
            .filter(|_| roll_enemy_kind(&mut rng) == EnemyKind::Fast)
            .count();
        assert!((1_700..2_300).contains(&fast), "fast count {fast}");
    }

    #[test]
    fn test_create_projectile_damage() {
        let p = create_projectile(EntityId(9), Vec2::ZERO, Vec2::X);
        assert_eq!(p.damage, 25);
        assert_eq!(p.direction, Vec2::X);
    }
}
