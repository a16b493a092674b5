//! High score leaderboard
//!
//! Top 10 runs by score, with the level each run reached. Stored as JSON next
//! to the settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached when the run ended
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a run to the leaderboard if it qualifies.
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("New high score {} (level {}) at rank {}", score, level, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard, starting fresh if the file is missing or broken
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
        };

        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Bad high score file {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Describe how long ago `timestamp` was, relative to `now` (both in seconds)
pub fn format_age(timestamp: u64, now: u64) -> String {
    let mins = now.saturating_sub(timestamp) / 60;
    let hours = mins / 60;
    let days = hours / 24;

    match (days, hours, mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}
