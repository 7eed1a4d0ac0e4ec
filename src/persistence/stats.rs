//! Lifetime aggregates across every run

use serde::{Deserialize, Serialize};

use crate::sim::{PowerUpCounts, RunRecord};

/// Cumulative stats, persisted as `stats.json`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    pub total_runs: u32,
    pub total_deaths: u32,
    pub total_food: u64,
    /// Seconds survived across all runs
    pub total_time: f64,
    pub total_score: u64,
    /// Power-ups used, per kind
    pub powerups: PowerUpCounts,
    pub average_score: f64,
    pub best_score: u64,
    pub longest_snake: usize,
}

impl LifetimeStats {
    /// Fold a finished run into the totals. `died` is false for runs cut
    /// short without a fatal collision.
    pub fn record(&mut self, run: &RunRecord, died: bool) {
        self.total_runs += 1;
        if died {
            self.total_deaths += 1;
        }
        self.total_food += u64::from(run.foods);
        self.total_time = ((self.total_time + run.duration) * 100.0).round() / 100.0;
        self.total_score += run.score;
        self.powerups.merge(&run.powerups);
        self.average_score =
            ((self.total_score as f64 / self.total_runs as f64) * 100.0).round() / 100.0;
        self.best_score = self.best_score.max(run.score);
        self.longest_snake = self.longest_snake.max(run.max_length);
    }
}
