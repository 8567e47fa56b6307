//! Comment-preserving parser and writer for `config.lod.ini`-style files.
//!
//! # File Format
//!
//! ```ini
//! ; full-line comment
//! # also a comment
//! top_level = 1
//!
//! [Hotkeys]
//! attack = 0x41        ; inline comment after whitespace
//! modifier=ctrl
//! title = "quoted value"
//! ```
//!
//! Every line keeps its raw text and its own terminator. Writing a document
//! emits both for all untouched lines, so a load/save cycle without edits
//! reproduces the file byte-for-byte (mixed line endings, BOM and missing
//! final newline included). Lines added by an edit use whichever terminator
//! the file uses most.

use crate::error::{ConfigError, ParseError, ParseErrorKind};
use crate::models::document::{choose_quote, Document, Entry, EntryFormat, LineKind};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

/// Parses a document from a file.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] if the file does not exist
/// - [`ConfigError::Io`] if it cannot be read
/// - [`ConfigError::Parse`] on malformed syntax
pub fn parse_ini_file(path: &Path) -> Result<Document, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;

    let document = parse_ini_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        sections = document.sections().count(),
        "Parsed config file"
    );
    Ok(document)
}

/// Parses a document from a string.
pub fn parse_ini_str(content: &str) -> Result<Document, ParseError> {
    let (content, bom) = match content.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, true),
        None => (content, false),
    };

    let mut doc = Document::empty(dominant_newline(content), bom);
    let mut current: Option<usize> = None;

    for (idx, piece) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let (raw, ending) = split_ending(piece);
        let trimmed = raw.trim();

        if trimmed.is_empty() || is_comment(trimmed) {
            doc.push_line(raw, ending, LineKind::Verbatim);
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let name = parse_header(rest).map_err(|kind| ParseError::new(line_no, kind))?;
            // A repeated header continues the existing section.
            let section = doc
                .section_index(name)
                .unwrap_or_else(|| doc.push_section(name));
            doc.push_line(raw, ending, LineKind::Header { section });
            current = Some(section);
            continue;
        }

        let entry = parse_entry(raw).map_err(|kind| ParseError::new(line_no, kind))?;
        let section = match current {
            Some(section) => section,
            None => doc
                .section_index("")
                .unwrap_or_else(|| doc.push_section("")),
        };
        doc.push_parsed_entry(section, raw, ending, entry);
    }

    Ok(doc)
}

/// Renders a document back to text.
#[must_use]
pub fn write_ini_string(doc: &Document) -> String {
    let mut out = String::new();
    if doc.bom {
        out.push(UTF8_BOM);
    }

    for line in &doc.lines {
        match line.kind {
            LineKind::Entry { section, entry } => {
                match doc.section_at(section).and_then(|s| s.entry(entry)) {
                    Some(entry) if entry.dirty => out.push_str(&render_entry(entry)),
                    _ => out.push_str(&line.raw),
                }
            }
            LineKind::Verbatim | LineKind::Header { .. } => out.push_str(&line.raw),
        }
        out.push_str(line.ending);
    }
    out
}

/// Writes a document to `path` using a temp file and an atomic rename.
///
/// The temp file is `<path>.tmp` next to the target. An existing file's
/// permissions are carried over to the replacement.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] (or `NotFound` when the directory is gone) if
/// the temp write, the permission copy or the rename fails.
pub fn write_ini_file(path: &Path, doc: &Document) -> Result<(), ConfigError> {
    let content = write_ini_string(doc);
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    fs::write(temp_path, content).map_err(|e| ConfigError::from_io(temp_path, e))?;

    if let Err(e) = replace_file(temp_path, path) {
        if let Err(cleanup) = fs::remove_file(temp_path) {
            warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp file");
        }
        return Err(ConfigError::from_io(path, e));
    }

    debug!(path = %path.display(), "Saved config file");
    Ok(())
}

/// Moves `temp` over `path`, keeping the permissions `path` had.
fn replace_file(temp: &Path, path: &Path) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(temp, meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::rename(temp, path)
}

/// Terminator used by most lines; `\n` when there are none or it is a tie.
fn dominant_newline(content: &str) -> &'static str {
    let crlf = content.matches("\r\n").count();
    let lf = content.matches('\n').count() - crlf;
    if crlf > lf {
        "\r\n"
    } else {
        "\n"
    }
}

/// Splits one `split_inclusive` piece into its text and terminator.
fn split_ending(piece: &str) -> (&str, &'static str) {
    if let Some(raw) = piece.strip_suffix("\r\n") {
        (raw, "\r\n")
    } else if let Some(raw) = piece.strip_suffix('\n') {
        (raw, "\n")
    } else {
        (piece, "")
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with(';') || trimmed.starts_with('#')
}

/// Parses the part of a header line after `[`, returning the section name.
fn parse_header(rest: &str) -> Result<&str, ParseErrorKind> {
    let close = rest
        .find(']')
        .ok_or(ParseErrorKind::UnterminatedSectionHeader)?;

    let name = rest[..close].trim();
    if name.is_empty() {
        return Err(ParseErrorKind::EmptySectionName);
    }

    let after = rest[close + 1..].trim_start();
    if !after.is_empty() && !is_comment(after) {
        return Err(ParseErrorKind::TrailingHeaderText);
    }

    Ok(name)
}

/// Splits a `key = value` line into its key, unquoted value and formatting.
fn parse_entry(raw: &str) -> Result<Entry, ParseErrorKind> {
    let body = raw.trim_start();
    let indent = &raw[..raw.len() - body.len()];

    let eq = body.find('=').ok_or(ParseErrorKind::MissingSeparator)?;
    let key = body[..eq].trim_end();
    if key.is_empty() {
        return Err(ParseErrorKind::EmptyKey);
    }

    let after_eq = &body[eq + 1..];
    let rest = after_eq.trim_start();
    let separator = format!("{}={}", &body[key.len()..eq], &after_eq[..after_eq.len() - rest.len()]);

    let (value, quote, trailing) = split_value(rest, separator.ends_with(char::is_whitespace));

    Ok(Entry::parsed(
        key.to_string(),
        value.to_string(),
        EntryFormat {
            indent: indent.to_string(),
            separator,
            quote,
            trailing: trailing.to_string(),
        },
    ))
}

/// Separates the value from quotes and any trailing inline comment.
///
/// An inline comment starts at `;` or `#` preceded by whitespace. Inside a
/// quoted value both characters are literal.
fn split_value(rest: &str, preceded_by_space: bool) -> (&str, Option<char>, &str) {
    if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
        if let Some(close) = rest[1..].find(quote) {
            let value = &rest[1..=close];
            let trailing = &rest[close + 2..];
            return (value, Some(quote), trailing);
        }
    }

    let mut prev_is_space = preceded_by_space;
    let mut comment_at = None;
    for (idx, c) in rest.char_indices() {
        if (c == ';' || c == '#') && prev_is_space {
            comment_at = Some(idx);
            break;
        }
        prev_is_space = c.is_whitespace();
    }

    let value = match comment_at {
        Some(idx) => rest[..idx].trim_end(),
        None => rest.trim_end(),
    };
    (value, None, &rest[value.len()..])
}

fn render_entry(entry: &Entry) -> String {
    let format = &entry.format;
    let value = entry.value();
    let quote = choose_quote(value, format.quote);

    let mut line = String::with_capacity(format.indent.len() + entry.key().len() + value.len() + 8);
    line.push_str(&format.indent);
    line.push_str(entry.key());
    line.push_str(&format.separator);
    if let Some(q) = quote {
        line.push(q);
        line.push_str(value);
        line.push(q);
    } else {
        line.push_str(value);
    }
    if !format.trailing.is_empty() && !format.trailing.starts_with(char::is_whitespace) {
        line.push(' ');
    }
    line.push_str(&format.trailing);
    line
}
