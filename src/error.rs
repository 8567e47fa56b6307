//! Error types for loading, editing and diffing the game configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Reason a line of the configuration file could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `[name` without the closing bracket
    UnterminatedSectionHeader,
    /// `[]` or `[   ]`
    EmptySectionName,
    /// Text after the closing bracket that is not a comment
    TrailingHeaderText,
    /// A non-comment line without `=`
    MissingSeparator,
    /// `= value` with nothing before the separator
    EmptyKey,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::UnterminatedSectionHeader => "unterminated section header",
            Self::EmptySectionName => "empty section name",
            Self::TrailingHeaderText => "unexpected text after section header",
            Self::MissingSeparator => "invalid key line: missing '='",
            Self::EmptyKey => "invalid key line: empty key name",
        };
        f.write_str(msg)
    }
}

/// Reason a section name, key or value is refused by `set`.
///
/// Each of these would either break the file or read back differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEntryKind {
    /// Contains `\n` or `\r`
    LineBreak,
    /// Leading or trailing whitespace, which is trimmed when reading
    SurroundingWhitespace,
    /// `]` inside a section name
    BracketInSection,
    /// Empty key name
    EmptyKey,
    /// Key starting with `[`, `;` or `#`
    KeyStartsLikeHeaderOrComment,
    /// `=` inside a key name
    SeparatorInKey,
    /// Value needs quoting but contains both `"` and `'`
    Unquotable,
}

impl std::fmt::Display for InvalidEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::LineBreak => "contains a line break",
            Self::SurroundingWhitespace => "has leading or trailing whitespace",
            Self::BracketInSection => "section names cannot contain ']'",
            Self::EmptyKey => "key is empty",
            Self::KeyStartsLikeHeaderOrComment => "key cannot start with '[', ';' or '#'",
            Self::SeparatorInKey => "key cannot contain '='",
            Self::Unquotable => "value needs quotes but contains both '\"' and '\''",
        };
        f.write_str(msg)
    }
}

/// Malformed structured-text syntax at a specific line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Errors returned by the config store, editor service and diff engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Reading or writing the file failed for a reason other than absence.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid structured text.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path being parsed
        path: PathBuf,
        /// Location and reason
        #[source]
        source: ParseError,
    },

    /// A section name or key that cannot be written back unchanged.
    #[error("invalid name {name:?}: {kind}")]
    InvalidName {
        /// Offending section name or key
        name: String,
        /// Why it was refused
        kind: InvalidEntryKind,
    },

    /// A value that cannot be written back unchanged.
    #[error("invalid value {value:?}: {kind}")]
    InvalidValue {
        /// Offending value
        value: String,
        /// Why it was refused
        kind: InvalidEntryKind,
    },

    /// An operation needing a loaded config was called before any load succeeded.
    #[error("config has not been loaded")]
    NotLoaded,

    /// The installation directory is unknown, so there is no file to load.
    #[error("game installation directory is not configured")]
    NotConfigured,
}

impl ConfigError {
    /// Classifies an I/O error on `path`, splitting out `NotFound`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
