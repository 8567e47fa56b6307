//! Application settings.
//!
//! This module handles loading and saving the editor's own settings (where the
//! game is installed, watcher timing) in TOML format with platform-specific
//! directory resolution. It is unrelated to the game's `config.lod.ini`,
//! which is handled by [`crate::config_store`].

use crate::constants::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_INTERNAL_WINDOW_MS, GAME_CONFIG_FILE_NAME, SETTINGS_DIR_ENV,
    SETTINGS_DIR_NAME,
};
use crate::services::editor::InstallDirProvider;
use crate::watcher::WatchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Game installation directory (the one holding `config.lod.ini`)
    pub game_dir: Option<PathBuf>,
    /// Other installation directories seen before, most recent first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_dirs: Vec<PathBuf>,
}

/// File watcher timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce window for change notifications (0 means default)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How long to ignore file events after our own save
    #[serde(default = "default_internal_window_ms")]
    pub internal_window_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_internal_window_ms() -> u64 {
    DEFAULT_INTERNAL_WINDOW_MS
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            internal_window_ms: default_internal_window_ms(),
        }
    }
}

impl WatchConfig {
    /// Converts to watcher options, replacing a zero debounce with the default.
    #[must_use]
    pub fn to_options(&self) -> WatchOptions {
        let debounce_ms = if self.debounce_ms == 0 {
            DEFAULT_DEBOUNCE_MS
        } else {
            self.debounce_ms
        };
        WatchOptions {
            debounce: Duration::from_millis(debounce_ms),
            internal_window: Duration::from_millis(self.internal_window_ms),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/lodconf/config.toml`
/// - macOS: `~/Library/Application Support/lodconf/config.toml`
/// - Windows: `%APPDATA%\lodconf\config.toml`
///
/// The directory can be overridden with the `LODCONF_CONFIG_DIR` environment
/// variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Watcher settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the settings directory, honoring `LODCONF_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(SETTINGS_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(SETTINGS_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit file using temp file + rename.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks that the game directory, if set, exists and is a directory.
    /// Whether it actually holds a config file is only known on load.
    pub fn validate(&self) -> Result<()> {
        if let Some(game_dir) = &self.paths.game_dir {
            if !game_dir.is_dir() {
                anyhow::bail!("Game directory does not exist: {}", game_dir.display());
            }
        }
        Ok(())
    }

    /// Sets the game directory with validation and remembers the previous one.
    pub fn set_game_dir(&mut self, dir: PathBuf) -> Result<()> {
        if !dir.is_dir() {
            anyhow::bail!("Game directory does not exist: {}", dir.display());
        }

        if let Some(previous) = self.paths.game_dir.replace(dir.clone()) {
            if previous != dir && !self.paths.known_dirs.contains(&previous) {
                self.paths.known_dirs.insert(0, previous);
            }
        }
        self.paths.known_dirs.retain(|known| known != &dir);
        Ok(())
    }

    /// Full path of the game config file, if the game directory is known.
    #[must_use]
    pub fn game_config_path(&self) -> Option<PathBuf> {
        self.paths
            .game_dir
            .as_ref()
            .map(|dir| dir.join(GAME_CONFIG_FILE_NAME))
    }
}

impl InstallDirProvider for Config {
    fn install_dir(&self) -> Option<PathBuf> {
        self.paths.game_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.game_dir, None);
        assert!(config.paths.known_dirs.is_empty());
        assert_eq!(config.watch.debounce_ms, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        let mut config = Config::new();
        config.paths.game_dir = Some(temp_dir.path().to_path_buf());
        config.watch.debounce_ms = 500;
        config.save_to(&config_file).unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[paths]\ngame_dir = \"/games/lod\"\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.paths.game_dir, Some(PathBuf::from("/games/lod")));
        assert_eq!(loaded.watch, WatchConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[paths\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_game_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.paths.game_dir = Some(temp_dir.path().join("gone"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Game directory does not exist"));
    }

    #[test]
    fn test_set_game_dir_tracks_known_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();

        let mut config = Config::new();
        config.set_game_dir(first.clone()).unwrap();
        config.set_game_dir(second.clone()).unwrap();
        assert_eq!(config.paths.game_dir, Some(second.clone()));
        assert_eq!(config.paths.known_dirs, vec![first.clone()]);

        config.set_game_dir(first.clone()).unwrap();
        assert_eq!(config.paths.known_dirs, vec![second]);

        assert!(config.set_game_dir(temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_game_config_path_and_provider() {
        let mut config = Config::new();
        assert_eq!(config.game_config_path(), None);
        assert_eq!(config.install_dir(), None);

        config.paths.game_dir = Some(PathBuf::from("/games/lod"));
        assert_eq!(
            config.game_config_path(),
            Some(PathBuf::from("/games/lod").join("config.lod.ini"))
        );
        assert_eq!(config.install_dir(), Some(PathBuf::from("/games/lod")));
    }

    #[test]
    fn test_watch_options() {
        let watch = WatchConfig {
            debounce_ms: 0,
            internal_window_ms: 10,
        };
        let options = watch.to_options();
        assert_eq!(options.debounce, Duration::from_millis(200));
        assert_eq!(options.internal_window, Duration::from_millis(10));
    }
}
