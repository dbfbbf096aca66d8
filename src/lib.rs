//! Arena Blaster - A top-down arena shooter
//!
//! Core modules:
//! - `sim`: Simulation store, entity factory, per-tick rules, commands and events
//! - `input`: Held-key and pointer translation into commands
//! - `schedule`: Fixed-interval tick cadences
//! - `session`: The simulation context tying everything together
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage backends
//! - `leaderboard`: Score submission and time-windowed queries

pub mod input;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod sim;

pub use leaderboard::{Leaderboard, LeaderboardStore, TimeFrame};
pub use session::{Observer, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Player and enemy sprites are 32x32 pixels
    pub const ENTITY_SIZE: f32 = 32.0;
    /// Enemies spawn this far outside the viewport edge
    pub const SPAWN_MARGIN: f32 = 32.0;
    /// Projectiles survive until they are this far outside the viewport
    pub const PROJECTILE_MARGIN: f32 = 32.0;

    /// Health bounds
    pub const MAX_HEALTH: i32 = 100;
    pub const ENEMY_START_HEALTH: i32 = 100;

    /// Player movement per input tick per held direction
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_DAMAGE: i32 = 25;
    /// Projectile-to-enemy center distance that counts as a hit
    pub const PROJECTILE_HIT_RADIUS: f32 = 24.0;

    /// Enemy-to-player center distance that counts as contact
    pub const CONTACT_RADIUS: f32 = 32.0;
    /// Health lost per touching enemy per simulation tick
    pub const CONTACT_DAMAGE: i32 = 10;

    /// Chance that a spawned enemy is the fast variant
    pub const FAST_ENEMY_CHANCE: f64 = 0.2;

    /// Survival bonus awarded per whole second alive
    pub const TIME_BONUS_PER_SECOND: i64 = 10;

    /// Tick periods (milliseconds)
    pub const INPUT_TICK_MS: f64 = 16.0;
    pub const SIM_TICK_MS: f64 = 16.0;
    pub const SPAWN_TICK_MS: f64 = 2000.0;
    /// Longest host frame the scheduler will account for (prevents catch-up bursts)
    pub const MAX_FRAME_MS: f64 = 100.0;
}
