//! Simulation module
//!
//! All gameplay logic lives here:
//! - Single mutable store (`GameState`) with explicit operations
//! - Seeded RNG only
//! - Fixed per-tick step sizes
//! - No rendering or platform dependencies

pub mod command;
pub mod event;
pub mod factory;
pub mod geometry;
pub mod state;
pub mod tick;

pub use command::{Command, apply};
pub use event::{EnemyView, Frame, GameEvent, ProjectileView, Snapshot};
pub use geometry::{Position, Viewport};
pub use state::{Enemy, EnemyKind, EntityId, GameState, Player, Projectile};
pub use tick::tick;
