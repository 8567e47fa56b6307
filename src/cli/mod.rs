//! CLI command handlers for lodconf.
//!
//! Each command is a clap `Args` struct with an `execute` method returning
//! [`CliResult`]. Commands that touch the game config take a [`Target`]
//! built from the global `--file` / `--game-dir` flags.

pub mod common;
pub mod config;
pub mod diff;
pub mod keycode;
pub mod sections;
pub mod value;
pub mod watch;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode, Target};
pub use config::ConfigArgs;
pub use diff::DiffArgs;
pub use keycode::KeycodeArgs;
pub use sections::SectionsArgs;
pub use value::{GetArgs, HotkeyArgs, SetArgs};
pub use watch::WatchArgs;
