//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the fixed config file name.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LoD Config Editor";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "lodconf";

/// File name of the game configuration inside the installation directory.
pub const GAME_CONFIG_FILE_NAME: &str = "config.lod.ini";

/// Directory name used under the platform config directory for app settings.
pub const SETTINGS_DIR_NAME: &str = "lodconf";

/// Environment variable that overrides the app settings directory.
pub const SETTINGS_DIR_ENV: &str = "LODCONF_CONFIG_DIR";

/// Default debounce window for file-change notifications, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Default window after an internal save during which file events are ignored.
pub const DEFAULT_INTERNAL_WINDOW_MS: u64 = 250;
