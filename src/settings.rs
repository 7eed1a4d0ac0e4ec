//! Application settings
//!
//! Read from `settings.json` in the data directory. Every field has a
//! default, so a partial (or missing) file still works.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_FILE;
use crate::persistence::{StoreError, load_or_default, save_json};
use crate::tuning::Tuning;

/// App settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Demo runs stop after this many ticks even if the snake survives
    pub demo_tick_limit: u64,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            demo_tick_limit: 20_000,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Settings file inside `data_dir`
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed
    pub fn load(path: &Path) -> Self {
        load_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings: Settings =
            serde_json::from_str(r#"{ "demo_tick_limit": 50, "tuning": { "grid_width": 16 } }"#)
                .unwrap();
        assert_eq!(settings.demo_tick_limit, 50);
        assert_eq!(settings.tuning.grid_width, 16);
        assert_eq!(settings.tuning.grid_height, crate::consts::GRID_HEIGHT);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("advanced-snake-settings-{}", std::process::id()));
        let path = Settings::path_in(&dir);
        let mut settings = Settings::default();
        settings.demo_tick_limit = 123;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_settings_share_store_directory() {
        use crate::persistence::Store;
        use crate::sim::RunSession;

        let dir = std::env::temp_dir().join(format!("advanced-snake-shared-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = Store::new(&dir);

        let mut settings = Settings::default();
        settings.demo_tick_limit = 77;
        settings.save(&Settings::path_in(store.dir())).unwrap();
        store.record_run(&RunSession::new(0.0).finalize(), true).unwrap();

        for file in [SETTINGS_FILE, crate::consts::HIGHSCORES_FILE, crate::consts::STATS_FILE] {
            assert!(dir.join(file).exists(), "{} missing", file);
        }
        assert_eq!(Settings::load(&Settings::path_in(store.dir())).demo_tick_limit, 77);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = Path::new("/nonexistent/advanced-snake/settings.json");
        assert_eq!(Settings::load(path), Settings::default());
    }
}
