//! JSON persistence for the leaderboard and lifetime stats
//!
//! Features:
//! - Pretty-printed JSON files in one data directory
//! - Atomic saves (write `.tmp`, then rename over the target)
//! - Missing or corrupt files fall back to empty defaults with a warning

pub mod stats;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::consts::{HIGHSCORES_FILE, STATS_FILE};
use crate::highscores::HighScores;
use crate::sim::RunRecord;
pub use stats::LifetimeStats;

/// Failure while writing persisted data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of recording a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRun {
    /// Leaderboard rank (1-indexed), if it made the top 10
    pub rank: Option<usize>,
    /// Beat the previous best score
    pub new_best: bool,
}

/// Load `path` as JSON, or `T::default()` when it is missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, starting fresh", path.display());
            return T::default();
        }
        Err(err) => {
            log::warn!("Could not read {}: {}, using defaults", path.display(), err);
            return T::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Malformed {}: {}, using defaults", path.display(), err);
            T::default()
        }
    }
}

/// Write `value` as pretty JSON via a temp file and rename
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Files in one data directory
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn highscores_path(&self) -> PathBuf {
        self.dir.join(HIGHSCORES_FILE)
    }

    fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    pub fn load_highscores(&self) -> HighScores {
        load_or_default(&self.highscores_path())
    }

    pub fn load_stats(&self) -> LifetimeStats {
        load_or_default(&self.stats_path())
    }

    /// Merge a finished run into the leaderboard and lifetime stats, then
    /// save both. `died` counts the run as a death in the stats.
    pub fn record_run(&self, run: &RunRecord, died: bool) -> Result<RecordedRun, StoreError> {
        let mut scores = self.load_highscores();
        let new_best = scores.is_new_best(run.score);
        let rank = scores.add_run(run.clone());

        let mut stats = self.load_stats();
        stats.record(run, died);

        save_json(&self.highscores_path(), &scores)?;
        save_json(&self.stats_path(), &stats)?;

        log::info!(
            "Recorded run: score {} (rank {:?}{})",
            run.score,
            rank,
            if new_best { ", new best" } else { "" }
        );
        Ok(RecordedRun { rank, new_best })
    }
}
