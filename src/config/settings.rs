//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// The screen region scanned for letter tiles.
///
/// The origin may be negative or the region may hang past a screen edge
/// (e.g. when the user drags the solve region near a border); the capture
/// layer clamps it to the visible screen at grab time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Left edge of the region in screen pixels.
    pub x: i32,
    /// Top edge of the region in screen pixels.
    pub y: i32,
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        // A 600 px square roughly centered on a 1080p lower half, where word
        // games draw their letter ring.
        Self {
            x: 660,
            y: 380,
            width: 600,
            height: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Tuning knobs for the solve/act cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Words shorter than this are discarded (most games reject 1–2 letter
    /// entries).
    pub min_word_len: usize,
    /// Pause between consecutive swipes in milliseconds, giving the game
    /// time to register and clear the previous word's effect.
    pub swipe_gap_ms: u64,
    /// Delay before the single frame-capture retry in milliseconds.
    pub frame_retry_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_word_len: 3,
            swipe_gap_ms: 450,
            frame_retry_ms: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key that triggers one capture → solve → swipe cycle (e.g. `"F9"`).
    pub solve_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            solve_key: "F9".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DictionaryConfig
// ---------------------------------------------------------------------------

/// Word-list location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Path to a newline-delimited word list.  `None` uses `words.txt` in
    /// the platform data dir (see [`AppPaths`]).
    pub path: Option<PathBuf>,
}

impl DictionaryConfig {
    /// The word-list path to load, falling back to the platform default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppPaths::new().dictionary_file)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use word_swiper::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Screen region scanned for letter tiles.
    pub capture: CaptureConfig,
    /// Solve/act cycle tuning.
    pub solver: SolverConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
    /// Word-list location.
    pub dictionary: DictionaryConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_pacing() {
        let config = AppConfig::default();
        assert_eq!(config.solver.min_word_len, 3);
        assert_eq!(config.solver.swipe_gap_ms, 450);
        assert_eq!(config.capture.width, 600);
        assert_eq!(config.hotkey.solve_key, "F9");
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut config = AppConfig::default();
        config.capture.x = -20;
        config.capture.y = 1000;
        config.solver.swipe_gap_ms = 300;
        config.hotkey.solve_key = "F6".into();
        config.dictionary.path = Some(PathBuf::from("/tmp/words.txt"));

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn dictionary_path_falls_back_to_data_dir() {
        let config = DictionaryConfig::default();
        assert!(config
            .resolved_path()
            .file_name()
            .is_some_and(|n| n == "words.txt"));

        let explicit = DictionaryConfig {
            path: Some(PathBuf::from("/opt/lists/en.txt")),
        };
        assert_eq!(explicit.resolved_path(), PathBuf::from("/opt/lists/en.txt"));
    }
}
