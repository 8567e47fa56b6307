//! In-memory model of a structured `[section]` / `key = value` file.
//!
//! A [`Document`] keeps two views of the same file:
//!
//! - a logical view of ordered [`Section`]s holding ordered [`Entry`]s, used for
//!   lookups, mutation and diffing;
//! - the original line list, where every line keeps its raw text so that
//!   untouched lines are written back byte-for-byte.
//!
//! Entries are only ever appended to a section, so an entry's index inside its
//! section is stable and lines can refer to it directly.

use crate::error::{ConfigError, InvalidEntryKind};

/// Formatting of a `key = value` line that must survive a value rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryFormat {
    /// Leading whitespace before the key
    pub indent: String,
    /// Exact text between the key and the value, including `=`
    pub separator: String,
    /// Quote character wrapping the value, if it was quoted
    pub quote: Option<char>,
    /// Trailing text after the value: whitespace plus an optional `;`/`#` comment
    pub trailing: String,
}

impl Default for EntryFormat {
    fn default() -> Self {
        Self {
            indent: String::new(),
            separator: " = ".to_string(),
            quote: None,
            trailing: String::new(),
        }
    }
}

/// A single key/value pair within a section.
///
/// Values are plain strings; any interpretation happens at the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: String,
    pub(crate) format: EntryFormat,
    /// Set when the value no longer matches the raw line it was parsed from
    pub(crate) dirty: bool,
}

impl Entry {
    pub(crate) fn parsed(key: String, value: String, format: EntryFormat) -> Self {
        Self {
            key,
            value,
            format,
            dirty: false,
        }
    }

    fn created(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            format: EntryFormat::default(),
            dirty: true,
        }
    }

    /// Key name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value with surrounding quotes removed.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Quote character the value is written with, if any.
    #[must_use]
    pub fn quote(&self) -> Option<char> {
        self.format.quote
    }

    /// Inline comment attached to this entry (e.g. `; default 1`), if any.
    #[must_use]
    pub fn inline_comment(&self) -> Option<&str> {
        let comment = self.format.trailing.trim_start();
        if comment.is_empty() {
            None
        } else {
            Some(comment)
        }
    }
}

/// A named, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Section name; `""` for keys declared before any header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in file order.
    pub fn keys(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the section holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `key` exists in this section.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Looks up an entry by key name.
    #[must_use]
    pub fn key_by_name(&self, key: &str) -> Option<&Entry> {
        self.position(key).map(|idx| &self.entries[idx])
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub(crate) fn entry(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }
}

/// What a physical line of the file represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Blank line, comment, or a shadowed duplicate key: always written as-is
    Verbatim,
    /// `[name]` header of the section at this index
    Header { section: usize },
    /// The line holding entry `entry` of section `section`
    Entry { section: usize, entry: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// Text without its line terminator
    pub raw: String,
    /// `"\n"`, `"\r\n"`, or `""` for a final line with no terminator
    pub ending: &'static str,
    pub kind: LineKind,
}

/// Ordered, comment-preserving configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
    pub(crate) lines: Vec<Line>,
    /// Terminator for lines added by `set`
    pub(crate) newline: &'static str,
    pub(crate) bom: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document using the platform line ending.
    #[must_use]
    pub fn new() -> Self {
        let newline = if cfg!(windows) { "\r\n" } else { "\n" };
        Self::empty(newline, false)
    }

    pub(crate) fn empty(newline: &'static str, bom: bool) -> Self {
        Self {
            sections: Vec::new(),
            lines: Vec::new(),
            newline,
            bom,
        }
    }

    /// Sections in file order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Looks up a section by exact (case-sensitive) name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.section_index(name).map(|idx| &self.sections[idx])
    }

    /// Returns the value of `section.key`, if present.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.key_by_name(key).map(Entry::value)
    }

    /// True when no section holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(Section::is_empty)
    }

    /// Creates or overwrites `section.key`.
    ///
    /// A missing section is appended at the end of the document. A new key is
    /// placed after the last entry of its section. Overwriting keeps the
    /// entry's indentation, separator, quoting and inline comment; writing the
    /// value already stored leaves the original line untouched.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidName`] or [`ConfigError::InvalidValue`] if the
    /// arguments could not be written back and read as the same entry. The
    /// document is not modified in that case.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        validate_entry(section, key, value)?;

        let section_idx = match self.section_index(section) {
            Some(idx) => idx,
            None => self.append_section(section),
        };

        let target = &mut self.sections[section_idx];
        if let Some(idx) = target.position(key) {
            let entry = &mut target.entries[idx];
            if entry.value != value {
                entry.value = value.to_string();
                entry.dirty = true;
            }
            return Ok(());
        }

        let entry_idx = target.entries.len();
        target.entries.push(Entry::created(key, value));

        let at = self.insertion_point(section_idx);
        self.insert_line(
            at,
            String::new(),
            LineKind::Entry {
                section: section_idx,
                entry: entry_idx,
            },
        );
        Ok(())
    }

    pub(crate) fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.name == name)
    }

    pub(crate) fn section_at(&self, idx: usize) -> Option<&Section> {
        self.sections.get(idx)
    }

    /// Registers a section parsed from a header (or the implicit default one).
    pub(crate) fn push_section(&mut self, name: &str) -> usize {
        self.sections.push(Section::new(name));
        self.sections.len() - 1
    }

    pub(crate) fn push_line(&mut self, raw: &str, ending: &'static str, kind: LineKind) {
        self.lines.push(Line {
            raw: raw.to_string(),
            ending,
            kind,
        });
    }

    /// Adds a parsed entry line. A repeated key overrides the earlier value and
    /// the earlier line is kept verbatim.
    pub(crate) fn push_parsed_entry(
        &mut self,
        section: usize,
        raw: &str,
        ending: &'static str,
        entry: Entry,
    ) {
        let target = &mut self.sections[section];
        let entry_idx = match target.position(&entry.key) {
            Some(idx) => {
                target.entries[idx] = entry;
                for line in &mut self.lines {
                    if line.kind == (LineKind::Entry { section, entry: idx }) {
                        line.kind = LineKind::Verbatim;
                    }
                }
                idx
            }
            None => {
                target.entries.push(entry);
                target.entries.len() - 1
            }
        };
        self.push_line(
            raw,
            ending,
            LineKind::Entry {
                section,
                entry: entry_idx,
            },
        );
    }

    /// Inserts a new line terminated with the document's newline. Appending
    /// after an unterminated last line moves the missing terminator to the
    /// new line instead.
    fn insert_line(&mut self, at: usize, raw: String, kind: LineKind) {
        let mut ending = self.newline;
        if at == self.lines.len() {
            if let Some(last) = self.lines.last_mut().filter(|line| line.ending.is_empty()) {
                last.ending = self.newline;
                ending = "";
            }
        }
        self.lines.insert(at, Line { raw, ending, kind });
    }

    fn append_section(&mut self, name: &str) -> usize {
        let idx = self.push_section(name);
        if name.is_empty() {
            // The default section has no header; its entries go before the first one.
            return idx;
        }
        if self.lines.last().is_some_and(|line| !line.raw.trim().is_empty()) {
            self.insert_line(self.lines.len(), String::new(), LineKind::Verbatim);
        }
        self.insert_line(
            self.lines.len(),
            format!("[{name}]"),
            LineKind::Header { section: idx },
        );
        idx
    }

    /// Line index right after the last header or entry line owned by `section`.
    fn insertion_point(&self, section: usize) -> usize {
        let owned = self.lines.iter().rposition(|line| match line.kind {
            LineKind::Header { section: s } | LineKind::Entry { section: s, .. } => s == section,
            LineKind::Verbatim => false,
        });
        match owned {
            Some(idx) => idx + 1,
            None => self
                .lines
                .iter()
                .position(|line| matches!(line.kind, LineKind::Header { .. }))
                .unwrap_or(self.lines.len()),
        }
    }
}

/// Checks that `section.key = value` can be written and read back unchanged.
///
/// Section names may be empty (the default section) but cannot contain `]`.
/// Keys cannot be empty, start with `[`, `;` or `#`, or contain `=`. None of
/// the three may contain a line break, and names may not carry surrounding
/// whitespace. A value that has to be quoted cannot contain both quote
/// characters.
///
/// # Errors
///
/// [`ConfigError::InvalidName`] for a bad section name or key,
/// [`ConfigError::InvalidValue`] for a bad value.
pub fn validate_entry(section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
    let bad_name = |kind| ConfigError::InvalidName {
        name: name_for(section, key),
        kind,
    };

    if has_line_break(section) {
        return Err(bad_name(InvalidEntryKind::LineBreak));
    }
    if section.trim() != section {
        return Err(bad_name(InvalidEntryKind::SurroundingWhitespace));
    }
    if section.contains(']') {
        return Err(bad_name(InvalidEntryKind::BracketInSection));
    }

    if key.is_empty() {
        return Err(bad_name(InvalidEntryKind::EmptyKey));
    }
    if has_line_break(key) {
        return Err(bad_name(InvalidEntryKind::LineBreak));
    }
    if key.trim() != key {
        return Err(bad_name(InvalidEntryKind::SurroundingWhitespace));
    }
    if key.starts_with(['[', ';', '#']) {
        return Err(bad_name(InvalidEntryKind::KeyStartsLikeHeaderOrComment));
    }
    if key.contains('=') {
        return Err(bad_name(InvalidEntryKind::SeparatorInKey));
    }

    let bad_value = |kind| ConfigError::InvalidValue {
        value: value.to_string(),
        kind,
    };
    if has_line_break(value) {
        return Err(bad_value(InvalidEntryKind::LineBreak));
    }
    if needs_quotes(value) && value.contains('"') && value.contains('\'') {
        return Err(bad_value(InvalidEntryKind::Unquotable));
    }
    Ok(())
}

fn name_for(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{section}.{key}")
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// True if writing `value` bare would not parse back to the same value.
pub(crate) fn needs_quotes(value: &str) -> bool {
    value != value.trim()
        || value.contains(';')
        || value.contains('#')
        || value.starts_with('"')
        || value.starts_with('\'')
}

/// Quote to write `value` with. Keeps `preferred` unless the value contains
/// it; an unquoted value only gains quotes when it needs them.
pub(crate) fn choose_quote(value: &str, preferred: Option<char>) -> Option<char> {
    let fits = |q: &char| !value.contains(*q);
    match preferred {
        Some(q) => [q, other_quote(q)].into_iter().find(fits),
        None if needs_quotes(value) => ['"', '\''].into_iter().find(fits),
        None => None,
    }
}

fn other_quote(quote: char) -> char {
    if quote == '"' {
        '\''
    } else {
        '"'
    }
}
