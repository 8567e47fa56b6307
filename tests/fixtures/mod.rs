//! Shared test fixtures for integration and E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A realistic config with comments, quoting and odd spacing.
pub const SAMPLE_CONFIG: &str = "\
; Generated by the game launcher
; Do not remove the header

[Graphics]
width = 1920
height=1080
vsync = 1 ; 0 = off

# Key bindings use virtual-key codes
[Hotkeys]
  attack = 0x41
  skill  = 0x7B
  modifier = ctrl
  unknown = 0xFFFF

[Player]
name = \"Lady Of Dawn\"
";

/// Creates a temp game directory holding `config.lod.ini` with `content`.
///
/// # Returns
/// The config file path and the temp dir guard (keep it alive).
pub fn create_game_dir(content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.lod.ini");
    fs::write(&path, content).expect("Failed to write config");
    (path, temp_dir)
}

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// Reads a file to a string, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}
