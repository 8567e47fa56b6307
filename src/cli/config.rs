//! Application settings CLI commands.

use crate::cli::common::{output_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Application settings commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current settings
    Show(ConfigShowArgs),
    /// Change settings
    Set(ConfigSetArgs),
}

/// Display current settings
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Change settings
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Game installation directory
    #[arg(long, value_name = "DIR")]
    game_dir: Option<PathBuf>,

    /// Watcher debounce window in milliseconds
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// How long to ignore file events after our own save, in milliseconds
    #[arg(long, value_name = "MS")]
    internal_window_ms: Option<u64>,
}

#[derive(Serialize, Debug)]
struct ConfigOutput {
    settings_file: Option<String>,
    game_dir: Option<String>,
    game_config: Option<String>,
    known_dirs: Vec<String>,
    debounce_ms: u64,
    internal_window_ms: u64,
}

impl ConfigOutput {
    fn new(config: &Config) -> Self {
        Self {
            settings_file: Config::config_file_path()
                .ok()
                .map(|p| p.display().to_string()),
            game_dir: config
                .paths
                .game_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            game_config: config.game_config_path().map(|p| p.display().to_string()),
            known_dirs: config
                .paths
                .known_dirs
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            debounce_ms: config.watch.debounce_ms,
            internal_window_ms: config.watch.internal_window_ms,
        }
    }
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load settings: {e:#}")))?;
        let output = ConfigOutput::new(&config);

        if self.json {
            return output_json(&output);
        }

        println!("Settings file: {}", output.settings_file.as_deref().unwrap_or("(unknown)"));
        println!();
        println!("Paths:");
        println!("  Game directory: {}", output.game_dir.as_deref().unwrap_or("(not set)"));
        if let Some(game_config) = &output.game_config {
            println!("  Game config:    {game_config}");
        }
        for dir in &output.known_dirs {
            println!("  Previously:     {dir}");
        }
        println!();
        println!("Watch:");
        println!("  Debounce:        {} ms", output.debounce_ms);
        println!("  Internal window: {} ms", output.internal_window_ms);
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.game_dir.is_none() && self.debounce_ms.is_none() && self.internal_window_ms.is_none()
        {
            return Err(CliError::validation(
                "At least one setting must be specified: --game-dir, --debounce-ms, or --internal-window-ms",
            ));
        }

        // A settings file that fails to load is left alone rather than replaced with defaults.
        let mut config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load settings: {e:#}")))?;

        if let Some(dir) = &self.game_dir {
            config
                .set_game_dir(dir.clone())
                .map_err(|e| CliError::validation(e.to_string()))?;
        }
        if let Some(ms) = self.debounce_ms {
            config.watch.debounce_ms = ms;
        }
        if let Some(ms) = self.internal_window_ms {
            config.watch.internal_window_ms = ms;
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save settings: {e:#}")))?;

        println!("✓ Settings saved");
        Ok(())
    }
}
