//! Reading and writing single config values.

use crate::cli::common::{output_json, CliResult, Target};
use clap::Args;
use serde::Serialize;

/// Print a config value
#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Section name (empty string for keys before the first header)
    pub section: String,

    /// Key name
    pub key: String,

    /// Value printed when the key is missing or empty
    #[arg(long, default_value = "")]
    pub default: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Set a config value and save the file
#[derive(Debug, Clone, Args)]
pub struct SetArgs {
    /// Section name (created if missing)
    pub section: String,

    /// Key name (created if missing)
    pub key: String,

    /// New value
    pub value: String,
}

/// Print a hotkey value the way the game shows it
#[derive(Debug, Clone, Args)]
pub struct HotkeyArgs {
    /// Section name
    pub section: String,

    /// Key name
    pub key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ValueOutput {
    section: String,
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct HotkeyOutput {
    section: String,
    key: String,
    raw: String,
    display: String,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let editor = target.open_editor()?;
        let value = editor.get_value(&self.section, &self.key, &self.default);

        if self.json {
            output_json(&ValueOutput {
                section: self.section.clone(),
                key: self.key.clone(),
                value,
            })
        } else {
            println!("{value}");
            Ok(())
        }
    }
}

impl SetArgs {
    /// Execute the set command
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let editor = target.open_editor()?;
        editor.set_value(&self.section, &self.key, &self.value)?;
        println!("✓ [{}] {} = {}", self.section, self.key, self.value);
        Ok(())
    }
}

impl HotkeyArgs {
    /// Execute the hotkey command
    pub fn execute(&self, target: &Target) -> CliResult<()> {
        let editor = target.open_editor()?;
        let raw = editor.get_value(&self.section, &self.key, "");
        let display = editor.get_hotkey_value(&self.section, &self.key);

        if self.json {
            output_json(&HotkeyOutput {
                section: self.section.clone(),
                key: self.key.clone(),
                raw,
                display,
            })
        } else {
            println!("{display}");
            Ok(())
        }
    }
}
