//! Virtual-key code table for hotkey rendering.
//!
//! The game stores hotkeys either as a modifier name (`ctrl`, `shift`, `alt`)
//! or as a raw Windows virtual-key code in hex (`0x41`). This module maps the
//! codes to lowercase canonical names and back.
//!
//! # Canonical code form
//!
//! Codes are stored as `0x` followed by uppercase hex digits, padded to at
//! least two digits (`0x0D`, `0x41`, `0x87`). Lookups accept either prefix
//! case and any digit case, and an unpadded code (`0xd`) resolves to its
//! padded form.

pub mod display;

use std::collections::HashMap;
use std::sync::LazyLock;

/// Named keys outside the generated ranges, in table order.
const NAMED_KEYS: &[(u16, &str)] = &[
    // Mouse
    (0x04, "middle mouse"),
    (0x05, "x1"),
    (0x06, "x2"),
    // Editing and navigation
    (0x08, "backspace"),
    (0x09, "tab"),
    (0x0D, "enter"),
    (0x14, "caps lock"),
    (0x1B, "esc"),
    (0x20, "space"),
    (0x21, "page up"),
    (0x22, "page down"),
    (0x23, "end"),
    (0x24, "home"),
    (0x25, "left"),
    (0x26, "up"),
    (0x27, "right"),
    (0x28, "down"),
    (0x2C, "print screen"),
    (0x2D, "insert"),
    (0x2E, "delete"),
];

const NUMPAD_OPERATORS: &[(u16, &str)] = &[
    (0x6A, "numpad *"),
    (0x6B, "numpad +"),
    (0x6D, "numpad -"),
    (0x6E, "numpad ."),
    (0x6F, "numpad /"),
];

const LOCK_KEYS: &[(u16, &str)] = &[(0x90, "num lock"), (0x91, "scroll lock")];

const PUNCTUATION: &[(u16, &str)] = &[
    (0xBA, ";"),
    (0xBB, "+"),
    (0xBC, ","),
    (0xBD, "-"),
    (0xBE, "."),
    (0xBF, "/"),
    (0xC0, "`"),
    (0xDB, "["),
    (0xDC, "\\"),
    (0xDD, "]"),
    (0xDE, "'"),
];

const MODIFIERS: &[(u16, &str)] = &[(0x10, "shift"), (0x11, "ctrl"), (0x12, "alt")];

static KEY_CODES: LazyLock<KeyCodeTable> = LazyLock::new(KeyCodeTable::build);

/// One `(code, name)` pair of the table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyCodeEntry {
    /// Canonical hex code, e.g. `0x41`
    pub code: String,
    /// Lowercase key name, e.g. `a`, `f12`, `numpad 5`
    pub name: String,
}

/// Immutable bidirectional map between virtual-key codes and key names.
#[derive(Debug, Clone)]
pub struct KeyCodeTable {
    /// All entries in definition order
    entries: Vec<KeyCodeEntry>,
    /// Canonical code → index into `entries`
    by_code: HashMap<String, usize>,
}

impl KeyCodeTable {
    /// The process-wide table, built on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        &KEY_CODES
    }

    fn build() -> Self {
        let mut pairs: Vec<(u16, String)> = Vec::with_capacity(128);

        pairs.extend(NAMED_KEYS.iter().map(|(vk, name)| (*vk, (*name).to_string())));
        pairs.extend((0..=9u16).map(|digit| (0x30 + digit, digit.to_string())));
        pairs.extend(('a'..='z').zip(0x41u16..).map(|(letter, vk)| (vk, letter.to_string())));
        pairs.extend((1..=24u16).map(|n| (0x6F + n, format!("f{n}"))));
        pairs.extend((0..=9u16).map(|digit| (0x60 + digit, format!("numpad {digit}"))));
        pairs.extend(NUMPAD_OPERATORS.iter().map(|(vk, name)| (*vk, (*name).to_string())));
        pairs.extend(LOCK_KEYS.iter().map(|(vk, name)| (*vk, (*name).to_string())));
        pairs.extend(PUNCTUATION.iter().map(|(vk, name)| (*vk, (*name).to_string())));
        pairs.extend(MODIFIERS.iter().map(|(vk, name)| (*vk, (*name).to_string())));

        let mut entries = Vec::with_capacity(pairs.len());
        let mut by_code = HashMap::with_capacity(pairs.len());
        for (vk, name) in pairs {
            let code = format_code(vk);
            by_code.insert(code.clone(), entries.len());
            entries.push(KeyCodeEntry { code, name });
        }

        Self { entries, by_code }
    }

    /// Returns the key name for a hex code, or `""` if unmapped.
    ///
    /// # Examples
    ///
    /// ```
    /// use lodconf::keycode_db::KeyCodeTable;
    ///
    /// let table = KeyCodeTable::global();
    /// assert_eq!(table.lookup("0x41"), "a");
    /// assert_eq!(table.lookup("0x0d"), "enter");
    /// assert_eq!(table.lookup("0xFFFF"), "");
    /// ```
    #[must_use]
    pub fn lookup(&self, code: &str) -> &str {
        normalize_code(code)
            .and_then(|code| self.by_code.get(&code))
            .map_or("", |idx| self.entries[*idx].name.as_str())
    }

    /// Returns the first code whose name equals `name` exactly, or `""`.
    ///
    /// Names are lowercase and matched case-sensitively.
    #[must_use]
    pub fn reverse_lookup(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map_or("", |entry| entry.code.as_str())
    }

    /// All entries in definition order.
    #[must_use]
    pub fn entries(&self) -> &[KeyCodeEntry] {
        &self.entries
    }

    /// Number of mapped codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for the built-in table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Brings a hex code into canonical form (`0x` + uppercase, min two digits).
///
/// Returns `None` for anything that is not `0x`/`0X` followed by 1–4 hex digits.
#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let digits = code
        .strip_prefix("0x")
        .or_else(|| code.strip_prefix("0X"))?;

    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    u16::from_str_radix(digits, 16).ok().map(format_code)
}

fn format_code(vk: u16) -> String {
    format!("0x{vk:02X}")
}
