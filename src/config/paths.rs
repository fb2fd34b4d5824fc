//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\word-swiper\
//!   macOS:   ~/Library/Application Support/word-swiper/
//!   Linux:   ~/.config/word-swiper/
//!
//! Data dir (dictionary):
//!   Windows: %LOCALAPPDATA%\word-swiper\
//!   macOS:   ~/Library/Application Support/word-swiper/
//!   Linux:   ~/.local/share/word-swiper/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for word lists.
    pub data_dir: PathBuf,
    /// Default dictionary file (`words.txt` in the data dir).
    pub dictionary_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "word-swiper";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let dictionary_file = data_dir.join("words.txt");

        Self {
            config_dir,
            settings_file,
            data_dir,
            dictionary_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
