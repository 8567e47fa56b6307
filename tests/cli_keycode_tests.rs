//! End-to-end tests for `lodconf keycode` commands.

use std::process::Command;

/// Path to the lodconf binary
fn lodconf_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lodconf")
}

fn keycode(args: &[&str]) -> std::process::Output {
    Command::new(lodconf_bin())
        .arg("keycode")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_lookup() {
    let output = keycode(&["lookup", "0x0d"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "enter\n");
}

#[test]
fn test_lookup_json_normalizes_code() {
    let output = keycode(&["lookup", "0xbe", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON");
    assert_eq!(result["code"], "0xBE");
    assert_eq!(result["name"], ".");
}

#[test]
fn test_lookup_unknown_fails() {
    let output = keycode(&["lookup", "0xFFFF"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown key code"));
}

#[test]
fn test_reverse() {
    let output = keycode(&["reverse", "f12"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0x7B\n");

    let output = keycode(&["reverse", "F12"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_list_json() {
    let output = keycode(&["list", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON");
    assert_eq!(entries.as_array().unwrap().len(), 111);
}

#[test]
fn test_list_filter() {
    let output = keycode(&["list", "--filter", "numpad", "--json"]);
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON");
    let entries = entries.as_array().unwrap();
    assert!(!entries.is_empty());
    assert!(entries
        .iter()
        .all(|e| e["name"].as_str().unwrap().contains("numpad")));
}

#[test]
fn test_format() {
    let output = keycode(&["format", "0x70"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "F1\n");

    let output = keycode(&["format", "shift"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Shift\n");
}
