//! Game state and core simulation types
//!
//! `GameState` is the single source of truth for a session. Everything that
//! changes the game goes through one of its operations; each runs to
//! completion before the next is applied.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::factory;
use super::geometry::{Position, Viewport};
use crate::consts::*;

/// Unique entity identifier, never reused within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Fast,
    /// Never spawned; has no stats of its own and moves/scores like `Basic`
    Boss,
}

impl EnemyKind {
    /// Pixels moved toward the player per simulation tick
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Fast => 3.0,
            EnemyKind::Basic | EnemyKind::Boss => 2.0,
        }
    }

    /// Score awarded when destroyed
    pub fn kill_score(&self) -> i64 {
        match self {
            EnemyKind::Fast => 150,
            EnemyKind::Basic | EnemyKind::Boss => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Boss => "boss",
        }
    }
}

/// The player avatar (top-left anchored 32x32 sprite)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
}

impl Player {
    pub const SIZE: f32 = ENTITY_SIZE;

    fn centered_in(viewport: &Viewport) -> Self {
        Self {
            pos: viewport.clamp_entity(viewport.center()),
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Position,
    pub health: i32,
    pub kind: EnemyKind,
}

/// A projectile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Position,
    /// Unit vector
    pub direction: Vec2,
    pub damage: i32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) viewport: Viewport,
    pub(crate) player: Player,
    /// Insertion order (draw order)
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) score: i64,
    /// Always within [0, MAX_HEALTH]
    pub(crate) health: i32,
    /// Reserved: starts at 1 and is never advanced
    pub(crate) level: u32,
    /// Session start (ms since epoch)
    pub(crate) start_time_ms: f64,
    pub(crate) game_over: bool,
    pub(crate) rng: Pcg32,
    /// Pending events since the last drain
    pub(crate) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session in `viewport` starting at `now_ms`
    pub fn new(viewport: Viewport, seed: u64, now_ms: f64) -> Self {
        Self {
            viewport,
            player: Player::centered_in(&viewport),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            health: MAX_HEALTH,
            level: 1,
            start_time_ms: now_ms,
            game_over: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn start_time_ms(&self) -> f64 {
        self.start_time_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Take every event recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Offset the player, clamped so the sprite stays inside the viewport
    pub fn move_player(&mut self, dx: f32, dy: f32) {
        let target = self.player.pos + Vec2::new(dx, dy);
        self.player.pos = self.viewport.clamp_entity(target);
    }

    pub fn increment_score(&mut self, points: i64) {
        self.score = self.score.saturating_add(points);
        self.events.push(GameEvent::ScoreChanged {
            points,
            score: self.score,
        });
    }

    /// Apply a health delta. This is the only way a game can end.
    pub fn update_health(&mut self, delta: i32) {
        let was_over = self.game_over;
        self.health = self.health.saturating_add(delta).clamp(0, MAX_HEALTH);
        self.game_over = self.health <= 0;
        self.events.push(GameEvent::HealthChanged {
            delta,
            health: self.health,
        });

        if self.game_over && !was_over {
            log::info!("Game over (score {})", self.score);
            self.events.push(GameEvent::GameOver { score: self.score });
        }
    }

    /// Spawn a random enemy just outside a random viewport edge
    pub fn spawn_enemy(&mut self) -> EntityId {
        let id = self.next_entity_id();
        let pos = factory::spawn_position(&self.viewport, &mut self.rng);
        let enemy = factory::create_enemy(id, pos, &mut self.rng);
        log::debug!("Spawned {} enemy {} at {:?}", enemy.kind.as_str(), id, pos);
        self.events.push(GameEvent::EnemySpawned {
            id,
            kind: enemy.kind,
            pos,
        });
        self.enemies.push(enemy);
        id
    }

    /// Remove an enemy by ID (no-op if absent)
    pub fn remove_enemy(&mut self, id: EntityId) {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.id != id);
        if self.enemies.len() != before {
            self.events.push(GameEvent::EnemyRemoved { id });
        }
    }

    /// Fire from the player's current position along an already-normalized direction
    pub fn add_projectile(&mut self, direction: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let projectile = factory::create_projectile(id, self.player.pos, direction);
        self.projectiles.push(projectile);
        self.events.push(GameEvent::ProjectileFired { id, direction });
        id
    }

    /// Back to initial-session defaults. Entity IDs keep counting so nothing
    /// from the previous session can alias a new entity.
    pub fn reset_game(&mut self, now_ms: f64) {
        self.player = Player::centered_in(&self.viewport);
        self.enemies.clear();
        self.projectiles.clear();
        self.score = 0;
        self.health = MAX_HEALTH;
        self.level = 1;
        self.start_time_ms = now_ms;
        self.game_over = false;
        self.events.clear();
        self.events.push(GameEvent::GameReset);
    }

    /// Whole seconds since the session started
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        ((now_ms - self.start_time_ms).max(0.0) / 1000.0).floor() as u64
    }

    /// Survival bonus at `now_ms`
    pub fn time_bonus(&self, now_ms: f64) -> i64 {
        (self.elapsed_secs(now_ms) as i64).saturating_mul(TIME_BONUS_PER_SECOND)
    }

    /// Kill score plus survival bonus, evaluated at call time
    pub fn final_score(&self, now_ms: f64) -> i64 {
        self.score.saturating_add(self.time_bonus(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(Viewport::new(800.0, 600.0), 12345, 1_000.0)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = new_state();
        assert_eq!(state.score(), 0);
        assert_eq!(state.health(), 100);
        assert_eq!(state.level(), 1);
        assert!(!state.is_game_over());
        assert!(state.enemies().is_empty());
        assert!(state.projectiles().is_empty());
        assert_eq!(state.player().pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_move_player_clamps() {
        let mut state = new_state();
        state.move_player(-1000.0, 0.0);
        assert_eq!(state.player().pos.x, 0.0);
        state.move_player(5000.0, 5000.0);
        assert_eq!(state.player().pos, Vec2::new(768.0, 568.0));
    }

    #[test]
    fn test_update_health_ends_game_at_zero() {
        let mut state = new_state();
        state.update_health(-150);
        assert_eq!(state.health(), 0);
        assert!(state.is_game_over());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_update_health_caps_at_max() {
        let mut state = new_state();
        state.update_health(-30);
        state.update_health(80);
        assert_eq!(state.health(), 100);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_remove_enemy_absent_is_noop() {
        let mut state = new_state();
        state.spawn_enemy();
        state.drain_events();
        state.remove_enemy(EntityId(999));
        assert_eq!(state.enemies().len(), 1);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_and_remove_enemy() {
        let mut state = new_state();
        let a = state.spawn_enemy();
        let b = state.spawn_enemy();
        assert_ne!(a, b);
        state.remove_enemy(a);
        assert_eq!(state.enemies().len(), 1);
        assert_eq!(state.enemies()[0].id, b);
    }

    #[test]
    fn test_add_projectile_at_player() {
        let mut state = new_state();
        state.move_player(10.0, -20.0);
        let id = state.add_projectile(Vec2::Y);
        let p = &state.projectiles()[0];
        assert_eq!(p.id, id);
        assert_eq!(p.pos, Vec2::new(410.0, 280.0));
        assert_eq!(p.damage, 25);
    }

    #[test]
    fn test_ids_unique_across_kinds_and_resets() {
        let mut state = new_state();
        let e = state.spawn_enemy();
        let p = state.add_projectile(Vec2::X);
        state.reset_game(2_000.0);
        let e2 = state.spawn_enemy();
        assert_ne!(e, p);
        assert!(e2 > e && e2 > p);
    }

    #[test]
    fn test_reset_game_restores_defaults() {
        let mut state = new_state();
        state.spawn_enemy();
        state.add_projectile(Vec2::X);
        state.increment_score(300);
        state.move_player(100.0, 100.0);
        state.update_health(-100);

        state.reset_game(5_000.0);

        assert_eq!(state.score(), 0);
        assert_eq!(state.health(), 100);
        assert_eq!(state.level(), 1);
        assert!(!state.is_game_over());
        assert!(state.enemies().is_empty());
        assert!(state.projectiles().is_empty());
        assert_eq!(state.player().pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.start_time_ms(), 5_000.0);
    }

    #[test]
    fn test_increment_score_saturates() {
        let mut state = new_state();
        state.increment_score(i64::MAX);
        state.increment_score(1);
        assert_eq!(state.score(), i64::MAX);
        assert_eq!(state.final_score(1_000.0), i64::MAX);
    }

    #[test]
    fn test_final_score_time_bonus() {
        let mut state = new_state();
        state.increment_score(250);
        // 12.9 seconds alive -> 12 whole seconds -> 120 bonus
        assert_eq!(state.final_score(13_900.0), 370);
        assert_eq!(state.final_score(1_000.0), 250);
    }

    proptest! {
        #[test]
        fn prop_health_stays_clamped(deltas in prop::collection::vec(-250i32..250, 0..64)) {
            let mut state = new_state();
            for d in deltas {
                state.update_health(d);
                prop_assert!((0..=100).contains(&state.health()));
                prop_assert_eq!(state.is_game_over(), state.health() == 0);
            }
        }

        #[test]
        fn prop_player_stays_in_bounds(moves in prop::collection::vec((-500f32..500.0, -500f32..500.0), 0..64)) {
            let mut state = new_state();
            for (dx, dy) in moves {
                state.move_player(dx, dy);
                let pos = state.player().pos;
                prop_assert!(pos.x >= 0.0 && pos.x <= 768.0);
                prop_assert!(pos.y >= 0.0 && pos.y <= 568.0);
            }
        }

        #[test]
        fn prop_final_score_formula(score in 0i64..1_000_000, elapsed in 0f64..10_000_000.0) {
            let mut state = GameState::new(Viewport::new(800.0, 600.0), 1, 0.0);
            state.increment_score(score);
            let now = elapsed;
            let expected = score + (elapsed / 1000.0).floor() as i64 * 10;
            prop_assert_eq!(state.final_score(now), expected);
        }
    }
}
