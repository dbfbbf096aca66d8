//! Events and read-only views emitted to observers
//!
//! The simulation never calls into presentation code. After each tick the
//! session packages what happened (`GameEvent`s) and what the world looks like
//! now (`Snapshot`) into a `Frame`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, EntityId, GameState};

/// Something observable that happened during a store mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: EntityId, kind: EnemyKind, pos: Vec2 },
    EnemyRemoved { id: EntityId },
    EnemyKilled { id: EntityId, kind: EnemyKind, points: i64 },
    ProjectileFired { id: EntityId, direction: Vec2 },
    ProjectileExpired { id: EntityId },
    ScoreChanged { points: i64, score: i64 },
    HealthChanged { delta: i32, health: i32 },
    GameOver { score: i64 },
    GameReset,
}

/// Enemy as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub pos: Vec2,
    pub health: i32,
    pub kind: EnemyKind,
}

/// Projectile as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub pos: Vec2,
}

/// Complete read-only picture of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Vec2,
    /// Insertion order, which is also draw order
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub score: i64,
    pub health: i32,
    pub level: u32,
    pub game_over: bool,
    pub elapsed_secs: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        Self {
            player: state.player.pos,
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    health: e.health,
                    kind: e.kind,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView { id: p.id, pos: p.pos })
                .collect(),
            score: state.score,
            health: state.health,
            level: state.level,
            game_over: state.game_over,
            elapsed_secs: state.elapsed_secs(now_ms),
        }
    }
}

/// What observers receive after every simulation tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Simulation ticks run in this session so far
    pub tick: u64,
    pub snapshot: Snapshot,
    pub events: Vec<GameEvent>,
}
