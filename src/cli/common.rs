//! Shared CLI plumbing: exit codes, error type, target resolution.

use crate::config::Config;
use crate::constants::GAME_CONFIG_FILE_NAME;
use crate::error::ConfigError;
use crate::services::editor::{ConfigEditor, FixedInstallDir};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Bad input or missing prerequisite (nothing configured, unknown key code)
    Validation = 1,
    /// File system or parse failure
    Io = 2,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by command handlers.
#[derive(Debug)]
pub struct CliError {
    /// Exit code the process should terminate with
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Invalid input or state.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O or parse failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotLoaded
            | ConfigError::NotConfigured
            | ConfigError::InvalidName { .. }
            | ConfigError::InvalidValue { .. } => Self::validation(err.to_string()),
            ConfigError::NotFound { .. } | ConfigError::Io { .. } | ConfigError::Parse { .. } => {
                Self::io(err.to_string())
            }
        }
    }
}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Which config file a command operates on.
///
/// Resolution order: `--file`, then `--game-dir`, then the game directory
/// stored in the application settings.
#[derive(Debug, Clone, Default)]
pub struct Target {
    /// Explicit config file
    pub file: Option<PathBuf>,
    /// Explicit game installation directory
    pub game_dir: Option<PathBuf>,
}

impl Target {
    /// Resolves the config file path.
    pub fn resolve(&self) -> CliResult<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        if let Some(dir) = &self.game_dir {
            return Ok(dir.join(GAME_CONFIG_FILE_NAME));
        }

        let config = Config::load()
            .map_err(|e| CliError::io(format!("Failed to load settings: {e:#}")))?;
        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid settings: {e:#}")))?;
        config
            .game_config_path()
            .ok_or_else(|| CliError::from(ConfigError::NotConfigured))
    }

    /// Builds an editor for the resolved file and loads it.
    pub fn open_editor(&self) -> CliResult<ConfigEditor> {
        let path = self.resolve()?;
        let editor = editor_for(&path);
        editor.load_from(&path)?;
        Ok(editor)
    }
}

/// Editor whose installation directory is the parent of `path`.
pub fn editor_for(path: &Path) -> ConfigEditor {
    let dir = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    ConfigEditor::new(FixedInstallDir(dir))
}

/// Prints `value` as pretty JSON.
pub fn output_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_exit_codes() {
        assert_eq!(CliError::from(ConfigError::NotLoaded).code, ExitCode::Validation);
        assert_eq!(CliError::from(ConfigError::NotConfigured).code, ExitCode::Validation);
        let invalid = ConfigError::InvalidValue {
            value: "1\n[B".into(),
            kind: crate::error::InvalidEntryKind::LineBreak,
        };
        assert_eq!(CliError::from(invalid).code, ExitCode::Validation);
        let not_found = ConfigError::NotFound {
            path: PathBuf::from("missing.ini"),
        };
        let err = CliError::from(not_found);
        assert_eq!(err.code, ExitCode::Io);
        assert!(err.message.contains("missing.ini"));
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Validation.code(), 1);
        assert_eq!(ExitCode::Io.code(), 2);
    }

    #[test]
    fn test_target_prefers_file() {
        let target = Target {
            file: Some(PathBuf::from("/tmp/custom.ini")),
            game_dir: Some(PathBuf::from("/games/lod")),
        };
        assert_eq!(target.resolve().unwrap(), PathBuf::from("/tmp/custom.ini"));

        let target = Target {
            file: None,
            game_dir: Some(PathBuf::from("/games/lod")),
        };
        assert_eq!(
            target.resolve().unwrap(),
            PathBuf::from("/games/lod").join("config.lod.ini")
        );
    }
}
