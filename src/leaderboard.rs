//! Leaderboard
//!
//! Final scores are submitted once per game and read back as a top-N list,
//! optionally restricted to the last day or week. Everything here is best
//! effort: failures are reported to the caller, who logs them and carries on.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, KeyValueStore, PersistenceError};

/// Entries shown by default
pub const DEFAULT_LIMIT: usize = 10;
/// Records kept in local storage (oldest drop off first)
pub const MAX_RECORDS: usize = 1000;

const DAY_MS: f64 = 86_400_000.0;
const WEEK_MS: f64 = 7.0 * DAY_MS;

/// Query window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    All,
    Daily,
    Weekly,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::All => "all",
            TimeFrame::Daily => "daily",
            TimeFrame::Weekly => "weekly",
        }
    }

    /// Oldest timestamp (inclusive) inside the window, if the window is bounded
    pub fn cutoff(&self, now_ms: f64) -> Option<f64> {
        match self {
            TimeFrame::All => None,
            TimeFrame::Daily => Some(now_ms - DAY_MS),
            TimeFrame::Weekly => Some(now_ms - WEEK_MS),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown time frame: {0}")]
pub struct UnknownTimeFrame(pub String);

impl FromStr for TimeFrame {
    type Err = UnknownTimeFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TimeFrame::All),
            "daily" | "day" => Ok(TimeFrame::Daily),
            "weekly" | "week" => Ok(TimeFrame::Weekly),
            _ => Err(UnknownTimeFrame(s.to_string())),
        }
    }
}

/// What the game sends when a player saves a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: i64,
    /// Who or what recorded the score
    pub attribution: String,
}

/// One row as read back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
    /// Unix timestamp (ms) when submitted
    pub timestamp: f64,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Leaderboard backend
pub trait LeaderboardStore {
    fn submit(&mut self, submission: ScoreSubmission, now_ms: f64) -> Result<(), LeaderboardError>;

    /// Best `limit` entries inside `frame`, highest score first
    fn top(
        &self,
        frame: TimeFrame,
        limit: usize,
        now_ms: f64,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// Stored row (keeps attribution alongside the public fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    username: String,
    score: i64,
    attribution: String,
    timestamp: f64,
}

/// Leaderboard persisted as JSON in a key-value store
pub struct Leaderboard {
    store: Box<dyn KeyValueStore>,
    /// Sorted by score, descending
    records: Vec<Record>,
}

impl Leaderboard {
    /// Storage key
    const STORAGE_KEY: &'static str = "arena_blaster_leaderboard";

    /// Load from `store`, starting fresh if nothing usable is there
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let records = match persistence::load_json::<Vec<Record>>(store.as_ref(), Self::STORAGE_KEY)
        {
            Ok(Some(mut records)) => {
                records.sort_by(|a, b| b.score.cmp(&a.score));
                log::info!("Loaded {} leaderboard entries", records.len());
                records
            }
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Vec::new()
            }
        };
        Self { store, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        persistence::save_json(self.store.as_mut(), Self::STORAGE_KEY, &self.records)
    }
}

impl LeaderboardStore for Leaderboard {
    fn submit(&mut self, submission: ScoreSubmission, now_ms: f64) -> Result<(), LeaderboardError> {
        let username = submission.username.trim();
        if username.is_empty() {
            return Err(LeaderboardError::EmptyUsername);
        }

        let record = Record {
            username: username.to_string(),
            score: submission.score,
            attribution: submission.attribution,
            timestamp: now_ms,
        };

        let previous = self.records.clone();

        // Equal scores keep submission order
        let pos = self
            .records
            .iter()
            .position(|r| record.score > r.score)
            .unwrap_or(self.records.len());
        self.records.insert(pos, record);

        // Full: drop the oldest record other than the one just added
        if self.records.len() > MAX_RECORDS {
            let oldest = self
                .records
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != pos)
                .min_by(|(_, a), (_, b)| a.timestamp.total_cmp(&b.timestamp))
                .map(|(i, _)| i);
            if let Some(oldest) = oldest {
                self.records.remove(oldest);
            }
        }

        if let Err(e) = self.save() {
            self.records = previous;
            return Err(e.into());
        }

        log::info!("Score {} saved for {}", submission.score, username);
        Ok(())
    }

    fn top(
        &self,
        frame: TimeFrame,
        limit: usize,
        now_ms: f64,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let cutoff = frame.cutoff(now_ms);
        Ok(self
            .records
            .iter()
            .filter(|r| cutoff.is_none_or(|c| r.timestamp >= c))
            .take(limit)
            .map(|r| LeaderboardEntry {
                username: r.username.clone(),
                score: r.score,
                timestamp: r.timestamp,
            })
            .collect())
    }
}

/// Submit and log the outcome. Returns true on success.
pub fn submit_score(
    board: &mut dyn LeaderboardStore,
    submission: ScoreSubmission,
    now_ms: f64,
) -> bool {
    match board.submit(submission, now_ms) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Error saving score: {}", e);
            false
        }
    }
}

/// Query and log failures. Returns an empty list on error.
pub fn fetch_top(
    board: &dyn LeaderboardStore,
    frame: TimeFrame,
    limit: usize,
    now_ms: f64,
) -> Vec<LeaderboardEntry> {
    board.top(frame, limit, now_ms).unwrap_or_else(|e| {
        log::warn!("Error loading leaderboard ({}): {}", frame.as_str(), e);
        Vec::new()
    })
}
