//! High score leaderboard system
//!
//! Keeps the top 10 runs by score plus the single best run ever recorded.
//! Persisted by `persistence::Store` as `highscores.json`.

use serde::{Deserialize, Serialize};

use crate::sim::RunRecord;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    /// Sorted by score, highest first
    pub runs: Vec<RunRecord>,
    pub best_run: Option<RunRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.runs.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.runs.last().map(|r| score > r.score).unwrap_or(true)
    }

    /// True if `score` beats the best run so far (any score does on an
    /// empty board)
    pub fn is_new_best(&self, score: u64) -> bool {
        self.best_run.as_ref().is_none_or(|best| score > best.score)
    }

    /// Add a finished run. Updates the best run when beaten and returns the
    /// leaderboard rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_run(&mut self, run: RunRecord) -> Option<usize> {
        if self.is_new_best(run.score) {
            self.best_run = Some(run.clone());
        }
        if !self.qualifies(run.score) {
            return None;
        }

        // Find insertion point (sorted descending by score)
        let pos = self.runs.iter().position(|r| run.score > r.score);
        let rank = match pos {
            Some(i) => {
                self.runs.insert(i, run);
                i + 1
            }
            None => {
                self.runs.push(run);
                self.runs.len()
            }
        };

        // Trim to max size
        self.runs.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
