//! Integration tests for the config editor, store and diff engine.

use lodconf::config_store::ConfigStore;
use lodconf::keycode_db::KeyCodeTable;
use lodconf::models::{DiffRecord, DiffStatus, SECTION_ADDED_MARKER};
use lodconf::services::{ConfigEditor, FixedInstallDir};
use lodconf::ConfigError;
use std::fs;

mod fixtures;
use fixtures::*;

fn loaded_editor(content: &str) -> (ConfigEditor, std::path::PathBuf, tempfile::TempDir) {
    let (path, temp_dir) = create_game_dir(content);
    let editor = ConfigEditor::new(FixedInstallDir(temp_dir.path().to_path_buf()));
    editor.load_config().expect("load should succeed");
    (editor, path, temp_dir)
}

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn test_load_save_is_byte_identical() {
    let content = "; top comment\n[A]\nx=1 ; first\n# middle\ny = 2\n";
    let (path, _temp_dir) = create_game_dir(content);

    let store = ConfigStore::open(&path).unwrap();
    store.save().unwrap();

    assert_eq!(read(&path), content);
}

#[test]
fn test_sample_round_trip_and_untouched_lines() {
    let (editor, path, _temp_dir) = loaded_editor(SAMPLE_CONFIG);
    editor.set_value("Graphics", "width", "2560").unwrap();

    let expected = SAMPLE_CONFIG.replace("width = 1920", "width = 2560");
    assert_eq!(read(&path), expected);
}

#[test]
fn test_quoted_value_keeps_quotes() {
    let (editor, path, _temp_dir) = loaded_editor(SAMPLE_CONFIG);
    assert_eq!(editor.get_value("Player", "name", ""), "Lady Of Dawn");

    editor.set_value("Player", "name", "Dusk").unwrap();
    assert!(read(&path).contains("name = \"Dusk\"\n"));
}

#[test]
fn test_crlf_file_stays_crlf() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\r\nx = 1\r\n");
    editor.set_value("A", "y", "2").unwrap();
    assert_eq!(read(&path), "[A]\r\nx = 1\r\ny = 2\r\n");
}

// ============================================================================
// Diff
// ============================================================================

#[test]
fn test_diff_is_idempotent() {
    let (editor, _path, _temp_dir) = loaded_editor(SAMPLE_CONFIG);
    assert!(editor.compute_diff().unwrap().is_empty());
    assert!(editor.compute_diff().unwrap().is_empty());
}

#[test]
fn test_diff_detects_added_section() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\nx = 1\n");
    fs::write(&path, "[A]\nx = 1\n\n[B]\nkey=val\n").unwrap();

    let diff = editor.compute_diff().unwrap();
    assert_eq!(diff.len(), 2);
    let sentinel = diff.section_record("B").unwrap();
    assert_eq!(sentinel.status(), DiffStatus::Added);
    assert_eq!(sentinel.new_value(), Some(SECTION_ADDED_MARKER));
    assert_eq!(
        diff.record("B", "key"),
        Some(&DiffRecord::Added { new: "val".into() })
    );
}

#[test]
fn test_diff_detects_modified_value() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\nx=1\n");
    fs::write(&path, "[A]\nx=2\n").unwrap();

    let diff = editor.compute_diff().unwrap();
    assert_eq!(diff.len(), 1);
    assert_eq!(
        diff.record("A", "x"),
        Some(&DiffRecord::Modified {
            old: "1".into(),
            new: "2".into()
        })
    );
}

#[test]
fn test_diff_detects_deleted_key() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\nx=1\ny=2\n");
    fs::write(&path, "[A]\nx=1\n").unwrap();

    let diff = editor.compute_diff().unwrap();
    assert_eq!(diff.len(), 1);
    let record = diff.record("A", "y").unwrap();
    assert_eq!(record.status(), DiffStatus::Deleted);
    assert_eq!(record.old_value(), Some("2"));
    assert_eq!(record.new_value(), None);
}

#[test]
fn test_diff_does_not_touch_live_state() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\nx=1\n");
    fs::write(&path, "[A]\nx=2\n").unwrap();

    editor.compute_diff().unwrap();
    assert_eq!(editor.get_value("A", "x", ""), "1");
}

#[test]
fn test_diff_fails_when_file_vanishes() {
    let (editor, path, _temp_dir) = loaded_editor("[A]\nx=1\n");
    fs::remove_file(&path).unwrap();
    assert!(matches!(
        editor.compute_diff(),
        Err(ConfigError::NotFound { .. })
    ));
}

// ============================================================================
// Hotkeys and key codes
// ============================================================================

#[test]
fn test_hotkey_formatting_through_editor() {
    let (editor, _path, _temp_dir) = loaded_editor(SAMPLE_CONFIG);
    assert_eq!(editor.get_hotkey_value("Hotkeys", "attack"), "A");
    assert_eq!(editor.get_hotkey_value("Hotkeys", "skill"), "F12");
    assert_eq!(editor.get_hotkey_value("Hotkeys", "modifier"), "Ctrl");
    assert_eq!(editor.get_hotkey_value("Hotkeys", "unknown"), "0xFFFF");
    assert_eq!(editor.get_hotkey_value("Hotkeys", "missing"), "");
}

#[test]
fn test_reverse_lookup_inverts_lookup() {
    let table = KeyCodeTable::global();
    for entry in table.entries() {
        assert_eq!(table.lookup(&entry.code), entry.name);
        let code = table.reverse_lookup(&entry.name);
        assert_eq!(table.lookup(code), entry.name, "name {}", entry.name);
    }
}

#[test]
fn test_lookup_accepts_either_case() {
    let table = KeyCodeTable::global();
    assert_eq!(table.lookup("0xbe"), ".");
    assert_eq!(table.lookup("0XBE"), ".");
    assert_eq!(table.lookup("0xBe"), ".");
}

// ============================================================================
// Unloaded state
// ============================================================================

#[test]
fn test_get_on_unloaded_store_is_empty() {
    let store = ConfigStore::new();
    assert_eq!(store.get("A", "x"), "");
    assert_eq!(store.get("", ""), "");
}

#[test]
fn test_editor_with_missing_file_stays_unavailable() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let editor = ConfigEditor::new(FixedInstallDir(temp_dir.path().to_path_buf()));

    assert!(editor.load_config().is_err());
    assert!(!editor.is_available());
    assert_eq!(editor.get_value("A", "x", "fallback"), "fallback");
    editor.set_value("A", "x", "1").unwrap();
    assert!(!temp_dir.path().join("config.lod.ini").exists());
}
