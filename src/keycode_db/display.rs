//! Hotkey display formatting.
//!
//! Turns a raw hotkey value from the config file into the label shown to the
//! user:
//!
//! | raw       | display  |
//! |-----------|----------|
//! | `ctrl`    | `Ctrl`   |
//! | `0x41`    | `A`      |
//! | `0x7B`    | `F12`    |
//! | `0x0D`    | `enter`  |
//! | `0xFFFF`  | `0xFFFF` |

use super::KeyCodeTable;

/// Modifier names stored verbatim in the config.
const MODIFIER_NAMES: [&str; 3] = ["ctrl", "shift", "alt"];

impl KeyCodeTable {
    /// Formats a raw hotkey value for display.
    ///
    /// - `ctrl` / `shift` / `alt` get their first letter capitalized.
    /// - A hex code is looked up: function keys become `F<n>`, single-character
    ///   names are uppercased, other names are returned as-is. Unmapped codes
    ///   are returned unchanged.
    /// - Anything else is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use lodconf::keycode_db::KeyCodeTable;
    ///
    /// let table = KeyCodeTable::global();
    /// assert_eq!(table.format_for_display("ctrl"), "Ctrl");
    /// assert_eq!(table.format_for_display("0x41"), "A");
    /// assert_eq!(table.format_for_display("0x7B"), "F12");
    /// assert_eq!(table.format_for_display("0xFFFF"), "0xFFFF");
    /// ```
    #[must_use]
    pub fn format_for_display(&self, raw: &str) -> String {
        if MODIFIER_NAMES.contains(&raw) {
            return capitalize(raw);
        }

        if !is_hex_prefixed(raw) {
            return raw.to_string();
        }

        let name = self.lookup(raw);
        if name.is_empty() {
            return raw.to_string();
        }

        if let Some(number) = name.strip_prefix('f').filter(|rest| !rest.is_empty()) {
            return format!("F{number}");
        }

        if name.chars().count() == 1 {
            return name.to_uppercase();
        }

        name.to_string()
    }
}

/// Formats a raw hotkey value with the process-wide table.
#[must_use]
pub fn format_hotkey(raw: &str) -> String {
    KeyCodeTable::global().format_for_display(raw)
}

fn is_hex_prefixed(raw: &str) -> bool {
    raw.starts_with("0x") || raw.starts_with("0X")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
