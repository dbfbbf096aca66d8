//! Shape generation for 2D primitives
//!
//! All coordinates are viewport pixels; the pipeline maps them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::ENTITY_SIZE;
use crate::sim::{EnemyKind, Snapshot};

/// Projectile sprite edge length (pixels)
const PROJECTILE_SIZE: f32 = 8.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (sin1, cos1) = theta1.sin_cos();
        let (sin2, cos2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(cos1, sin1) * inner_radius;
        let outer1 = center + Vec2::new(cos1, sin1) * outer_radius;
        let inner2 = center + Vec2::new(cos2, sin2) * inner_radius;
        let outer2 = center + Vec2::new(cos2, sin2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Distinguishing color for fast enemies, default for the rest
pub fn enemy_color(kind: EnemyKind) -> [f32; 4] {
    match kind {
        EnemyKind::Fast => colors::ENEMY_FAST,
        EnemyKind::Basic | EnemyKind::Boss => colors::ENEMY,
    }
}

/// Sprites are anchored at their top-left corner like DOM elements
fn sprite_center(top_left: Vec2, size: f32) -> Vec2 {
    top_left + Vec2::splat(size / 2.0)
}

/// Build the whole scene: enemies, then projectiles, then the player on top
pub fn scene(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let half = ENTITY_SIZE / 2.0;

    for enemy in &snapshot.enemies {
        vertices.extend(circle(
            sprite_center(enemy.pos, ENTITY_SIZE),
            half,
            enemy_color(enemy.kind),
            CIRCLE_SEGMENTS,
        ));
    }

    for projectile in &snapshot.projectiles {
        vertices.extend(circle(
            sprite_center(projectile.pos, PROJECTILE_SIZE),
            PROJECTILE_SIZE / 2.0,
            colors::PROJECTILE,
            8,
        ));
    }

    let player = sprite_center(snapshot.player, ENTITY_SIZE);
    vertices.extend(circle(player, half, colors::PLAYER, CIRCLE_SEGMENTS));
    vertices.extend(ring(player, half - 2.0, half, colors::PLAYER_RING, CIRCLE_SEGMENTS));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyView, EntityId, ProjectileView};

    fn snapshot() -> Snapshot {
        Snapshot {
            player: Vec2::new(100.0, 100.0),
            enemies: vec![
                EnemyView {
                    id: EntityId(1),
                    pos: Vec2::ZERO,
                    health: 100,
                    kind: EnemyKind::Basic,
                },
                EnemyView {
                    id: EntityId(2),
                    pos: Vec2::new(50.0, 0.0),
                    health: 100,
                    kind: EnemyKind::Fast,
                },
            ],
            projectiles: vec![ProjectileView {
                id: EntityId(3),
                pos: Vec2::new(10.0, 10.0),
            }],
            score: 0,
            health: 100,
            level: 1,
            game_over: false,
            elapsed_secs: 0,
        }
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 1.0, colors::PLAYER, 12).len(), 36);
    }

    #[test]
    fn test_scene_layers_and_colors() {
        let vertices = scene(&snapshot());
        let per_enemy = (CIRCLE_SEGMENTS * 3) as usize;
        let per_projectile = 8 * 3;
        let player = (CIRCLE_SEGMENTS * 3 + CIRCLE_SEGMENTS * 6) as usize;
        assert_eq!(vertices.len(), 2 * per_enemy + per_projectile + player);

        assert_eq!(vertices[0].color, colors::ENEMY);
        assert_eq!(vertices[0].position, [16.0, 16.0]);
        assert_eq!(vertices[per_enemy].color, colors::ENEMY_FAST);
        assert_eq!(vertices[2 * per_enemy].color, colors::PROJECTILE);
        assert_eq!(vertices.last().unwrap().color, colors::PLAYER_RING);
    }
}
