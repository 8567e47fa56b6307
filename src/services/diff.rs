//! Drift detection between the live config and the file on disk.
//!
//! # Algorithm
//!
//! ```text
//! forward pass (disk → memory)
//!     section only on disk    → Section sentinel (added) + every key added
//!     key only on disk        → added
//!     key on both, different  → modified
//! backward pass (memory → disk)
//!     section only in memory  → Section sentinel (deleted), keys not listed
//!     key only in memory      → deleted
//! ```
//!
//! A section without keys counts as absent on either side.

use crate::config_store::ConfigStore;
use crate::error::ConfigError;
use crate::models::diff::{
    ConfigDiff, DiffKey, DiffRecord, SECTION_ADDED_MARKER, SECTION_DELETED_MARKER,
};
use crate::models::document::{Document, Section};
use crate::parser::ini::parse_ini_file;
use tracing::debug;

/// Compares a loaded store against a fresh read of its own file.
///
/// The file is parsed into a throwaway document; `live` is only read.
///
/// # Errors
///
/// - [`ConfigError::NotLoaded`] if `live` has never been loaded
/// - any load error from re-reading the file, with no partial result
pub fn compute_diff(live: &ConfigStore) -> Result<ConfigDiff, ConfigError> {
    let (Some(path), Some(live_doc)) = (live.path(), live.document()) else {
        return Err(ConfigError::NotLoaded);
    };

    let disk_doc = parse_ini_file(path)?;
    let diff = diff_documents(live_doc, &disk_doc);

    debug!(
        path = %path.display(),
        records = diff.len(),
        "Computed config diff"
    );
    Ok(diff)
}

/// Compares two documents; `live` is the in-memory side, `disk` the file side.
#[must_use]
pub fn diff_documents(live: &Document, disk: &Document) -> ConfigDiff {
    let mut diff = ConfigDiff::default();

    for disk_section in disk.sections().filter(|s| !s.is_empty()) {
        match present_section(live, disk_section.name()) {
            None => record_added_section(&mut diff, disk_section),
            Some(live_section) => compare_keys(&mut diff, live_section, disk_section),
        }
    }

    for live_section in live.sections().filter(|s| !s.is_empty()) {
        let name = live_section.name();
        match present_section(disk, name) {
            None => diff.insert(
                name,
                DiffKey::Section,
                DiffRecord::Deleted {
                    old: SECTION_DELETED_MARKER.to_string(),
                },
            ),
            Some(disk_section) => {
                for entry in live_section.keys().filter(|e| !disk_section.has_key(e.key())) {
                    diff.insert(
                        name,
                        DiffKey::Key(entry.key().to_string()),
                        DiffRecord::Deleted {
                            old: entry.value().to_string(),
                        },
                    );
                }
            }
        }
    }

    diff
}

fn present_section<'a>(doc: &'a Document, name: &str) -> Option<&'a Section> {
    doc.section(name).filter(|section| !section.is_empty())
}

fn record_added_section(diff: &mut ConfigDiff, section: &Section) {
    let name = section.name();
    diff.insert(
        name,
        DiffKey::Section,
        DiffRecord::Added {
            new: SECTION_ADDED_MARKER.to_string(),
        },
    );
    for entry in section.keys() {
        diff.insert(
            name,
            DiffKey::Key(entry.key().to_string()),
            DiffRecord::Added {
                new: entry.value().to_string(),
            },
        );
    }
}

fn compare_keys(diff: &mut ConfigDiff, live: &Section, disk: &Section) {
    let name = disk.name();
    for disk_entry in disk.keys() {
        let key = DiffKey::Key(disk_entry.key().to_string());
        match live.key_by_name(disk_entry.key()) {
            None => diff.insert(
                name,
                key,
                DiffRecord::Added {
                    new: disk_entry.value().to_string(),
                },
            ),
            Some(live_entry) if live_entry.value() != disk_entry.value() => diff.insert(
                name,
                key,
                DiffRecord::Modified {
                    old: live_entry.value().to_string(),
                    new: disk_entry.value().to_string(),
                },
            ),
            Some(_) => {}
        }
    }
}
