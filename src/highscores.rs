//! High score leaderboard
//!
//! Tracks the top 10 finished runs, persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::StoreError;
use crate::sim::GameResult;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Seconds survived
    pub elapsed_seconds: u32,
    pub bonus_eggs: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Slot a score would take; ties rank below the runs already recorded
    fn slot_for(&self, score: u64) -> Option<usize> {
        let slot = self.entries.partition_point(|e| e.score >= score);
        (score > 0 && slot < MAX_HIGH_SCORES).then_some(slot)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.slot_for(score).is_some()
    }

    /// 1-based rank a score would reach
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.slot_for(score).map(|slot| slot + 1)
    }

    /// Record a finished run, returning its 1-based rank if it made the table
    pub fn record(&mut self, result: &GameResult, timestamp: u64) -> Option<usize> {
        let slot = self.slot_for(result.score)?;
        self.entries.insert(
            slot,
            HighScoreEntry {
                score: result.score,
                elapsed_seconds: result.elapsed_seconds,
                bonus_eggs: result.bonus_eggs,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh when missing or unreadable
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(StoreError::from)
            .and_then(|json| Ok(serde_json::from_str::<HighScores>(&json)?));
        match loaded {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::info!("No high scores loaded ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string(self).map_err(|e| StoreError::Encode(e.to_string()))?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: u64) -> GameResult {
        GameResult {
            score,
            elapsed_seconds: 30,
            bonus_eggs: 1,
            enemies_down: 4,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_sorted_insert_and_truncate() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.record(&result(s * 100), s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1200));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));

        assert_eq!(scores.potential_rank(250), None);
        assert_eq!(scores.record(&result(650), 99), Some(7));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut scores = HighScores::new();
        scores.record(&result(500), 1);
        assert_eq!(scores.record(&result(500), 2), Some(2));
        assert_eq!(scores.entries[0].timestamp, 1);
        assert_eq!(scores.potential_rank(501), Some(1));
    }

    #[test]
    fn test_save_and_load() {
        let path =
            std::env::temp_dir().join(format!("chicken_galaxy_scores_{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.record(&result(500), 1);
        scores.save(&path).expect("save");
        assert_eq!(HighScores::load(&path), scores);
        let _ = std::fs::remove_file(&path);
        assert!(HighScores::load(&path).is_empty());
    }
}
