//! Fixed timestep simulation tick
//!
//! Per-tick rules for projectiles and enemies. A tick always finishes moving
//! projectiles before enemies look for hits, so collision checks see this
//! tick's projectile positions.

use super::event::GameEvent;
use super::geometry::{direction, within_radius};
use super::state::GameState;
use crate::consts::*;

/// Advance the simulation by one tick. Does nothing once the game is over.
pub fn tick(state: &mut GameState) {
    if state.game_over {
        return;
    }
    state.update_projectiles();
    state.update_enemies();
}

impl GameState {
    /// Move every projectile one step, then drop the ones that left the field
    pub fn update_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.pos += projectile.direction * PROJECTILE_SPEED;
        }

        let viewport = self.viewport;
        let events = &mut self.events;
        self.projectiles.retain(|p| {
            let alive = viewport.contains_with_margin(p.pos, PROJECTILE_MARGIN);
            if !alive {
                events.push(GameEvent::ProjectileExpired { id: p.id });
            }
            alive
        });
    }

    /// Chase, take projectile damage, hurt the player on contact, die.
    ///
    /// Works from the positions at the start of the pass: distances and hits
    /// use each enemy's pre-move position. Projectiles are not consumed, so one
    /// projectile can damage every enemy it overlaps. Contact damage stacks
    /// across enemies.
    pub fn update_enemies(&mut self) {
        let player_pos = self.player.pos;
        let hits: Vec<_> = self
            .projectiles
            .iter()
            .map(|p| (p.pos, p.damage))
            .collect();

        let enemies = std::mem::take(&mut self.enemies);
        let mut survivors = Vec::with_capacity(enemies.len());

        for mut enemy in enemies {
            let next_pos = enemy.pos + direction(enemy.pos, player_pos) * enemy.kind.speed();

            let damage: i32 = hits
                .iter()
                .filter(|(pos, _)| within_radius(*pos, enemy.pos, PROJECTILE_HIT_RADIUS))
                .map(|(_, damage)| damage)
                .sum();
            let health = enemy.health - damage;

            if within_radius(enemy.pos, player_pos, CONTACT_RADIUS) {
                self.update_health(-CONTACT_DAMAGE);
            }

            if health <= 0 {
                let points = enemy.kind.kill_score();
                log::debug!("Enemy {} destroyed (+{})", enemy.id, points);
                self.increment_score(points);
                self.events.push(GameEvent::EnemyKilled {
                    id: enemy.id,
                    kind: enemy.kind,
                    points,
                });
                continue;
            }

            enemy.pos = next_pos;
            enemy.health = health;
            survivors.push(enemy);
        }

        self.enemies = survivors;
    }
}
