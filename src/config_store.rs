//! File-backed structured config store.
//!
//! [`ConfigStore`] pairs a parsed [`Document`] with the path it was loaded
//! from. Lookups never fail: anything missing reads as `""`.

use crate::error::ConfigError;
use crate::models::document::{validate_entry, Document, Section};
use crate::parser::ini::{parse_ini_file, write_ini_file};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A loaded configuration document and the file it came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    document: Option<Document>,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Creates an empty, unloaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store and loads `path` into it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Loads `path`, replacing the current document.
    ///
    /// On failure the previous document and path are left as they were.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Io` or `Parse` depending on what went wrong.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let document = parse_ini_file(path)?;
        self.document = Some(document);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Returns the value of `section.key`, or `""` if it does not exist.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> &str {
        self.document
            .as_ref()
            .and_then(|doc| doc.get(section, key))
            .unwrap_or("")
    }

    /// Creates or overwrites `section.key` in memory. No disk I/O.
    ///
    /// Does nothing if no document has been loaded.
    ///
    /// # Errors
    ///
    /// `InvalidName` or `InvalidValue` (see [`validate_entry`]), whether or
    /// not a document is loaded. Nothing changes on error.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        validate_entry(section, key, value)?;
        match self.document.as_mut() {
            Some(doc) => doc.set(section, key, value),
            None => {
                debug!(section, key, "Ignoring set on unloaded config");
                Ok(())
            }
        }
    }

    /// Writes the document back to the path it was loaded from.
    ///
    /// Succeeds without writing anything when nothing has been loaded.
    pub fn save(&self) -> Result<(), ConfigError> {
        match (&self.document, &self.path) {
            (Some(doc), Some(path)) => write_ini_file(path, doc),
            _ => Ok(()),
        }
    }

    /// Path of the last successful load.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The loaded document, if any.
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Sections of the loaded document in file order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.document.iter().flat_map(Document::sections)
    }

    /// True once a load has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// True if nothing is loaded or the loaded document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.as_ref().map_or(true, Document::is_empty)
    }

    /// Puts back a document captured before a failed write.
    pub(crate) fn restore_document(&mut self, document: Option<Document>) {
        self.document = document;
    }
}
