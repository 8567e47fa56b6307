//! lodconf library
//!
//! Reads, edits and watches the `config.lod.ini` file of a game
//! installation. Edits keep comments, ordering and formatting of untouched
//! lines; values written through the editor are saved immediately.
//!
//! # Example
//!
//! ```no_run
//! use lodconf::services::{ConfigEditor, FixedInstallDir};
//!
//! let editor = ConfigEditor::new(FixedInstallDir("/games/lod".into()));
//! editor.load_config()?;
//! let attack = editor.get_hotkey_value("Hotkeys", "attack");
//! editor.set_value("Graphics", "vsync", "1")?;
//! # Ok::<(), lodconf::error::ConfigError>(())
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod config_store;
pub mod constants;
pub mod error;
pub mod keycode_db;
pub mod models;
pub mod parser;
pub mod services;
pub mod watcher;

pub use config_store::ConfigStore;
pub use error::{ConfigError, InvalidEntryKind, ParseError};
pub use keycode_db::KeyCodeTable;
pub use services::ConfigEditor;
