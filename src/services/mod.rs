//! Service layer for business logic.
//!
//! This module contains the editor service that guards the live config and
//! the diff engine that compares it with the file on disk.

pub mod diff;
pub mod editor;

// Re-export commonly used types and functions
pub use diff::{compute_diff, diff_documents};
pub use editor::{ConfigEditor, FixedInstallDir, InstallDirProvider};
