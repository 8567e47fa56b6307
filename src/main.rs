//! lodconf - command-line editor for the game's `config.lod.ini`.
//!
//! Reads and writes single values without disturbing comments or layout,
//! formats hotkeys, compares the file with a baseline and watches it for
//! changes made by the game or other tools.

use clap::{Parser, Subcommand};
use lodconf::cli::{
    CliError, ConfigArgs, DiffArgs, GetArgs, HotkeyArgs, KeycodeArgs, SectionsArgs, SetArgs,
    Target, WatchArgs,
};
use lodconf::constants::{APP_BINARY_NAME, APP_NAME};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// LoD Config Editor - read, edit and watch config.lod.ini
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Game installation directory (overrides settings)
    #[arg(long, global = true, value_name = "DIR")]
    game_dir: Option<PathBuf>,

    /// Config file to operate on (overrides --game-dir and settings)
    #[arg(long, global = true, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a config value
    Get(GetArgs),
    /// Set a config value and save the file
    Set(SetArgs),
    /// Print a hotkey formatted for display
    Hotkey(HotkeyArgs),
    /// List sections and keys
    Sections(SectionsArgs),
    /// Compare the config file with a baseline
    Diff(DiffArgs),
    /// Watch the config file for outside changes
    Watch(WatchArgs),
    /// Key-code table lookups
    Keycode(KeycodeArgs),
    /// Application settings
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let target = Target {
        file: cli.file,
        game_dir: cli.game_dir,
    };

    match cli.command {
        Commands::Get(args) => args.execute(&target),
        Commands::Set(args) => args.execute(&target),
        Commands::Hotkey(args) => args.execute(&target),
        Commands::Sections(args) => args.execute(&target),
        Commands::Diff(args) => args.execute(&target),
        Commands::Watch(args) => args.execute(&target),
        Commands::Keycode(args) => args.execute(),
        Commands::Config(args) => args.execute(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(app = APP_NAME, version = env!("CARGO_PKG_VERSION"), "Starting");

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(e.code.code());
    }
}
