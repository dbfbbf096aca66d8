//! Commands: the only way code outside `sim` changes a `GameState`
//!
//! Input handlers and the scheduler build commands; `apply` is the single
//! dispatch point so the order of mutations is explicit and testable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, GameState};
use super::tick::tick;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Offset the player by (dx, dy) pixels
    MovePlayer { dx: f32, dy: f32 },
    /// Fire along an already-normalized direction
    Fire { direction: Vec2 },
    /// One simulation step (projectiles, then enemies)
    Step,
    SpawnEnemy,
    RemoveEnemy { id: EntityId },
    IncrementScore { points: i64 },
    UpdateHealth { delta: i32 },
    Reset { now_ms: f64 },
}

/// Apply a command to the state
pub fn apply(state: &mut GameState, command: Command) {
    log::trace!("apply {:?}", command);
    match command {
        Command::MovePlayer { dx, dy } => state.move_player(dx, dy),
        Command::Fire { direction } => {
            state.add_projectile(direction);
        }
        Command::Step => tick(state),
        Command::SpawnEnemy => {
            state.spawn_enemy();
        }
        Command::RemoveEnemy { id } => state.remove_enemy(id),
        Command::IncrementScore { points } => state.increment_score(points),
        Command::UpdateHealth { delta } => state.update_health(delta),
        Command::Reset { now_ms } => state.reset_game(now_ms),
    }
}
