//! Game settings and preferences
//!
//! Persisted as JSON next to the leaderboard. Missing fields take their
//! defaults, so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::leaderboard::{DEFAULT_LIMIT, TimeFrame};
use crate::persistence::{self, KeyValueStore, PersistenceError};
use crate::schedule::TickRates;

/// Shortest tick period accepted from a settings file
const MIN_TICK_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name submitted with saved scores
    pub username: String,
    /// Attribution stored alongside submitted scores
    pub attribution: String,

    // === Timing ===
    pub timing: TickRates,

    // === Leaderboard ===
    /// Rows shown
    pub leaderboard_size: usize,
    /// Window selected when the page loads
    pub leaderboard_frame: TimeFrame,
    /// Seconds between leaderboard refreshes
    pub leaderboard_refresh_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: "player".to_string(),
            attribution: "arena-blaster".to_string(),

            timing: TickRates::default(),

            leaderboard_size: DEFAULT_LIMIT,
            leaderboard_frame: TimeFrame::All,
            leaderboard_refresh_secs: 30,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "arena_blaster_settings";

    /// Tick rates with nonsensical periods replaced by defaults
    pub fn timing(&self) -> TickRates {
        let defaults = TickRates::default();
        let pick = |value: f64, fallback: f64| {
            if value.is_finite() && value >= MIN_TICK_MS {
                value
            } else {
                fallback
            }
        };
        TickRates {
            input_ms: pick(self.timing.input_ms, defaults.input_ms),
            sim_ms: pick(self.timing.sim_ms, defaults.sim_ms),
            spawn_ms: pick(self.timing.spawn_ms, defaults.spawn_ms),
        }
    }

    /// Leaderboard rows, at least one
    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size.clamp(1, 100)
    }

    /// Leaderboard refresh period, between one second and one hour
    pub fn leaderboard_refresh_ms(&self) -> i32 {
        self.leaderboard_refresh_secs.clamp(1, 3600) as i32 * 1000
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring saved settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            username: "ace".to_string(),
            leaderboard_frame: TimeFrame::Weekly,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"username":"zed"}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.username, "zed");
        assert_eq!(settings.timing, TickRates::default());
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "[]").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_refresh_period_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.leaderboard_refresh_ms(), 30_000);
        settings.leaderboard_refresh_secs = 0;
        assert_eq!(settings.leaderboard_refresh_ms(), 1_000);
        settings.leaderboard_refresh_secs = u32::MAX;
        assert_eq!(settings.leaderboard_refresh_ms(), 3_600_000);
    }

    #[test]
    fn test_invalid_timing_replaced() {
        let settings = Settings {
            timing: TickRates {
                input_ms: 0.0,
                sim_ms: f64::NAN,
                spawn_ms: 500.0,
            },
            ..Default::default()
        };
        let timing = settings.timing();
        assert_eq!(timing.input_ms, 16.0);
        assert_eq!(timing.sim_ms, 16.0);
        assert_eq!(timing.spawn_ms, 500.0);
    }
}
