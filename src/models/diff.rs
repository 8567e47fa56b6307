//! Typed result of comparing two versions of the configuration.

use std::collections::BTreeMap;
use std::fmt;

/// Value reported as `new` when a whole section appeared.
pub const SECTION_ADDED_MARKER: &str = "<added>";

/// Value reported as `old` when a whole section disappeared.
pub const SECTION_DELETED_MARKER: &str = "<deleted>";

/// Classification of a single discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Present on disk, absent in memory
    Added,
    /// Present on both sides with different values
    Modified,
    /// Present in memory, absent on disk
    Deleted,
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        })
    }
}

/// Key of a diff record within its section.
///
/// `Section` stands for the section as a whole and can never collide with a
/// real key name. It orders before every `Key`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiffKey {
    /// The whole section was added or deleted
    Section,
    /// A single key
    Key(String),
}

impl DiffKey {
    /// Key name, or `None` for the whole-section sentinel.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Section => None,
            Self::Key(key) => Some(key),
        }
    }
}

impl fmt::Display for DiffKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section => f.write_str("*"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// One discrepancy between the in-memory and on-disk configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRecord {
    /// Only the disk side has it
    Added {
        /// Value on disk
        new: String,
    },
    /// Both sides have it with different values
    Modified {
        /// Value in memory
        old: String,
        /// Value on disk
        new: String,
    },
    /// Only the memory side has it
    Deleted {
        /// Value in memory
        old: String,
    },
}

impl DiffRecord {
    /// Status tag of this record.
    #[must_use]
    pub fn status(&self) -> DiffStatus {
        match self {
            Self::Added { .. } => DiffStatus::Added,
            Self::Modified { .. } => DiffStatus::Modified,
            Self::Deleted { .. } => DiffStatus::Deleted,
        }
    }

    /// In-memory value; `None` for added records.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        match self {
            Self::Added { .. } => None,
            Self::Modified { old, .. } | Self::Deleted { old } => Some(old),
        }
    }

    /// On-disk value; `None` for deleted records.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        match self {
            Self::Deleted { .. } => None,
            Self::Added { new } | Self::Modified { new, .. } => Some(new),
        }
    }
}

/// Records grouped by section, then by key.
pub type SectionDiff = BTreeMap<DiffKey, DiffRecord>;

/// Full comparison result. Sections without differences never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    sections: BTreeMap<String, SectionDiff>,
}

impl ConfigDiff {
    /// True when both sides agree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of records, sentinels included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// Records of one section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SectionDiff> {
        self.sections.get(name)
    }

    /// Names of sections with at least one record.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Record for `section.key`.
    #[must_use]
    pub fn record(&self, section: &str, key: &str) -> Option<&DiffRecord> {
        self.sections
            .get(section)?
            .get(&DiffKey::Key(key.to_string()))
    }

    /// Whole-section sentinel record for `section`.
    #[must_use]
    pub fn section_record(&self, section: &str) -> Option<&DiffRecord> {
        self.sections.get(section)?.get(&DiffKey::Section)
    }

    /// Flattened `(section, key, record)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffKey, &DiffRecord)> {
        self.sections.iter().flat_map(|(section, records)| {
            records
                .iter()
                .map(move |(key, record)| (section.as_str(), key, record))
        })
    }

    pub(crate) fn insert(&mut self, section: &str, key: DiffKey, record: DiffRecord) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key, record);
    }
}
