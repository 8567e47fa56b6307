//! Listing the contents of a config file.

use crate::cli::common::{output_json, CliResult, Target};
use clap::Args;
use serde::Serialize;

/// List sections and their keys
#[derive(Debug, Clone, Args)]
pub struct SectionsArgs {
    /// Show key/value pairs under each section
    #[arg(short, long)]
    pub keys: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SectionOutput {
    name: String,
    keys: Vec<KeyOutput>,
}

#[derive(Debug, Serialize)]
struct KeyOutput {
    key: String,
    value: String,
}

impl SectionsArgs {
    /// Execute the sections command
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let editor = target.open_editor()?;
        let store = editor.snapshot();

        let sections: Vec<SectionOutput> = store
            .sections()
            .map(|section| SectionOutput {
                name: section.name().to_string(),
                keys: section
                    .keys()
                    .map(|entry| KeyOutput {
                        key: entry.key().to_string(),
                        value: entry.value().to_string(),
                    })
                    .collect(),
            })
            .collect();

        if self.json {
            return output_json(&sections);
        }

        for section in &sections {
            if section.name.is_empty() {
                println!("(default) ({} keys)", section.keys.len());
            } else {
                println!("[{}] ({} keys)", section.name, section.keys.len());
            }
            if self.keys {
                for entry in &section.keys {
                    println!("  {} = {}", entry.key, entry.value);
                }
            }
        }
        Ok(())
    }
}
