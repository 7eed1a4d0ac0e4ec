//! Advanced Snake - grid arcade game with power-ups, hazards and levels
//!
//! Core modules:
//! - `sim`: Deterministic engine (snake, hazards, power-ups, levels, scoring)
//! - `highscores`: Top 10 runs and best run
//! - `persistence`: JSON store for the leaderboard and lifetime stats
//! - `settings`: App settings loaded from disk
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use persistence::{Store, StoreError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield size in cells
    pub const GRID_WIDTH: i32 = 30;
    pub const GRID_HEIGHT: i32 = 20;

    /// Directory holding settings, leaderboard and stats
    pub const DATA_DIR: &str = "data";
    /// Leaderboard file inside the data directory
    pub const HIGHSCORES_FILE: &str = "highscores.json";
    /// Lifetime stats file inside the data directory
    pub const STATS_FILE: &str = "stats.json";
    /// Settings file inside the data directory
    pub const SETTINGS_FILE: &str = "settings.json";
}
