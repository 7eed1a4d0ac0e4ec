//! Per-run statistics
//!
//! `RunSession` is mutated while the run is live. `finalize` consumes it
//! and yields the read-only `RunRecord` handed to persistence.

use serde::{Deserialize, Serialize};

use super::powerups::PowerUpKind;
use super::scoring::Streak;

/// Power-ups collected, per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpCounts {
    pub speed: u32,
    pub shrink: u32,
    pub freeze: u32,
    pub shield: u32,
}

impl PowerUpCounts {
    pub fn get(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::SpeedBoost => self.speed,
            PowerUpKind::Shrink => self.shrink,
            PowerUpKind::Freeze => self.freeze,
            PowerUpKind::Shield => self.shield,
        }
    }

    pub fn increment(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::SpeedBoost => self.speed += 1,
            PowerUpKind::Shrink => self.shrink += 1,
            PowerUpKind::Freeze => self.freeze += 1,
            PowerUpKind::Shield => self.shield += 1,
        }
    }

    /// Add another set of counts into this one
    pub fn merge(&mut self, other: &PowerUpCounts) {
        self.speed += other.speed;
        self.shrink += other.shrink;
        self.freeze += other.freeze;
        self.shield += other.shield;
    }

    pub fn total(&self) -> u32 {
        self.speed + self.shrink + self.freeze + self.shield
    }
}

/// Live counters for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSession {
    pub score: u64,
    pub level: u32,
    /// Engine ticks elapsed
    pub ticks: u64,
    /// Survival time, advanced by `1 / effective tick rate` per tick
    pub survived_secs: f64,
    pub foods_eaten: u32,
    pub power_ups: PowerUpCounts,
    pub max_length: usize,
    pub streak: Streak,
    /// Unix time (ms) when the run started
    pub started_at_ms: f64,
}

impl RunSession {
    pub fn new(started_at_ms: f64) -> Self {
        Self {
            score: 0,
            level: 1,
            ticks: 0,
            survived_secs: 0.0,
            foods_eaten: 0,
            power_ups: PowerUpCounts::default(),
            max_length: 0,
            streak: Streak::default(),
            started_at_ms,
        }
    }

    pub fn record_length(&mut self, length: usize) {
        self.max_length = self.max_length.max(length);
    }

    /// Freeze the counters into the persisted record
    pub fn finalize(self) -> RunRecord {
        RunRecord {
            score: self.score,
            level: self.level,
            duration: (self.survived_secs * 100.0).round() / 100.0,
            foods: self.foods_eaten,
            powerups: self.power_ups,
            max_length: self.max_length,
            timestamp: self.started_at_ms,
        }
    }
}

/// Finished run, as stored in the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    /// Highest level reached
    pub level: u32,
    /// Seconds survived
    pub duration: f64,
    pub foods: u32,
    pub powerups: PowerUpCounts,
    pub max_length: usize,
    /// Unix timestamp (ms) of the run start
    pub timestamp: f64,
}
