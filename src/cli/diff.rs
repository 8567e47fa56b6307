//! Comparing a config file against a baseline copy.

use crate::cli::common::{output_json, CliError, CliResult, Target};
use crate::models::diff::{ConfigDiff, DiffStatus};
use crate::parser::ini::parse_ini_file;
use crate::services::diff::diff_documents;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show what changed between a baseline file and the config file
#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Baseline file (for example a backup taken before the game ran)
    #[arg(long, value_name = "FILE")]
    pub against: PathBuf,

    /// Exit with code 1 when differences are found
    #[arg(long)]
    pub exit_code: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One flattened diff record.
#[derive(Debug, Serialize)]
pub struct DiffRow {
    section: String,
    /// `None` for the whole-section record
    key: Option<String>,
    status: DiffStatus,
    old: Option<String>,
    new: Option<String>,
}

/// Flattens a diff into rows ordered by section, then key.
#[must_use]
pub fn diff_rows(diff: &ConfigDiff) -> Vec<DiffRow> {
    diff.iter()
        .map(|(section, key, record)| DiffRow {
            section: section.to_string(),
            key: key.as_key().map(str::to_string),
            status: record.status(),
            old: record.old_value().map(str::to_string),
            new: record.new_value().map(str::to_string),
        })
        .collect()
}

/// Prints a diff in a `git diff --stat`-like layout.
pub fn print_diff(diff: &ConfigDiff) {
    if diff.is_empty() {
        println!("No differences");
        return;
    }

    for row in diff_rows(diff) {
        let label = match &row.key {
            Some(key) => format!("[{}] {}", row.section, key),
            None => format!("[{}]", row.section),
        };
        match row.status {
            DiffStatus::Added => println!("+ {label} = {}", row.new.unwrap_or_default()),
            DiffStatus::Deleted => println!("- {label} = {}", row.old.unwrap_or_default()),
            DiffStatus::Modified => println!(
                "~ {label}: {} -> {}",
                row.old.unwrap_or_default(),
                row.new.unwrap_or_default()
            ),
        }
    }
}

impl DiffArgs {
    /// Execute the diff command
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let path = target.resolve()?;
        let baseline = parse_ini_file(&self.against)?;
        let current = parse_ini_file(&path)?;
        let diff = diff_documents(&baseline, &current);

        if self.json {
            output_json(&diff_rows(&diff))?;
        } else {
            print_diff(&diff);
        }

        if self.exit_code && !diff.is_empty() {
            return Err(CliError::validation(format!(
                "{} differences found",
                diff.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ini::parse_ini_str;

    #[test]
    fn test_diff_rows_flatten_section_records() {
        let baseline = parse_ini_str("[A]\nx = 1\n").unwrap();
        let current = parse_ini_str("[A]\nx = 2\n[B]\ny = 3\n").unwrap();
        let rows = diff_rows(&diff_documents(&baseline, &current));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].section, "A");
        assert_eq!(rows[0].key.as_deref(), Some("x"));
        assert_eq!(rows[0].status, DiffStatus::Modified);
        assert_eq!(rows[1].section, "B");
        assert_eq!(rows[1].key, None);
        assert_eq!(rows[1].new.as_deref(), Some("<added>"));
        assert_eq!(rows[2].key.as_deref(), Some("y"));
        assert_eq!(rows[2].old, None);
    }
}
