//! Watching the config file for outside changes.

use crate::cli::common::{editor_for, CliError, CliResult, Target};
use crate::cli::diff::print_diff;
use crate::config::{Config, WatchConfig};
use crate::watcher::ConfigWatcher;
use clap::Args;
use tracing::{info, warn};

/// Watch the config file and report changes made outside this tool
#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// Debounce window in milliseconds (overrides settings)
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Stop after this many change notifications
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,
}

impl WatchArgs {
    /// Execute the watch command. Runs until interrupted or `--count` is reached.
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let path = target.resolve()?;
        let mut watch = match Config::load() {
            Ok(config) => config.watch,
            Err(e) => {
                warn!("Ignoring unreadable settings, using default watch timing: {e:#}");
                WatchConfig::default()
            }
        };
        if let Some(ms) = self.debounce_ms {
            watch.debounce_ms = ms;
        }

        let (watcher, changes) = ConfigWatcher::start(&path, watch.to_options())
            .map_err(|e| CliError::io(format!("Failed to watch {}: {e}", path.display())))?;
        let editor = editor_for(&path).with_internal_changes(watcher.internal_changes());
        editor.load_from(&path)?;

        println!("Watching {} (Ctrl+C to stop)", watcher.path().display());

        let mut seen = 0;
        for change in changes {
            match editor.compute_diff() {
                Ok(diff) => {
                    println!("Changed: {}", change.path.display());
                    print_diff(&diff);
                }
                Err(e) => warn!(error = %e, "Could not diff changed config"),
            }
            if let Err(e) = editor.reload() {
                warn!(error = %e, "Keeping previous config");
            }

            seen += 1;
            if self.count.is_some_and(|count| seen >= count) {
                info!(changes = seen, "Stopping watcher");
                break;
            }
        }
        Ok(())
    }
}
