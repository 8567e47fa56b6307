//! Data models for the configuration document and its diff.
//!
//! Models carry no I/O; reading and writing live in [`crate::parser`].

pub mod diff;
pub mod document;

// Re-export all model types
pub use diff::{
    ConfigDiff, DiffKey, DiffRecord, DiffStatus, SectionDiff, SECTION_ADDED_MARKER,
    SECTION_DELETED_MARKER,
};
pub use document::{validate_entry, Document, Entry, Section};
