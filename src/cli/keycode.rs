//! Key-code table commands.

use crate::cli::common::{output_json, CliError, CliResult};
use crate::keycode_db::{normalize_code, KeyCodeTable};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Look up virtual-key codes
#[derive(Debug, Args)]
pub struct KeycodeArgs {
    #[command(subcommand)]
    command: KeycodeCommand,
}

#[derive(Debug, Subcommand)]
enum KeycodeCommand {
    /// Name for a hex code (e.g. 0x41)
    Lookup(LookupArgs),
    /// Hex code for a name (e.g. "f12")
    Reverse(ReverseArgs),
    /// List the whole table
    List(ListArgs),
    /// Format a raw config value for display
    Format(FormatArgs),
}

/// Name for a hex code
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Hex code, `0x` prefix required
    code: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Hex code for a name
#[derive(Debug, Args)]
pub struct ReverseArgs {
    /// Key name, exact match
    name: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// List every known key code
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only names containing this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Format a raw hotkey value
#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Raw value as stored in the config file
    raw: String,
}

#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
    code: String,
    name: &'a str,
}

impl KeycodeArgs {
    /// Execute keycode subcommand
    pub fn execute(&self) -> CliResult<()> {
        let table = KeyCodeTable::global();
        match &self.command {
            KeycodeCommand::Lookup(args) => args.execute(table),
            KeycodeCommand::Reverse(args) => args.execute(table),
            KeycodeCommand::List(args) => args.execute(table),
            KeycodeCommand::Format(args) => {
                println!("{}", table.format_for_display(&args.raw));
                Ok(())
            }
        }
    }
}

impl LookupArgs {
    fn execute(&self, table: &KeyCodeTable) -> CliResult<()> {
        let name = table.lookup(&self.code);
        if name.is_empty() {
            return Err(CliError::validation(format!(
                "Unknown key code: {}",
                self.code
            )));
        }

        let code = normalize_code(&self.code).unwrap_or_else(|| self.code.clone());
        if self.json {
            output_json(&LookupOutput { code, name })
        } else {
            println!("{name}");
            Ok(())
        }
    }
}

impl ReverseArgs {
    fn execute(&self, table: &KeyCodeTable) -> CliResult<()> {
        let code = table.reverse_lookup(&self.name);
        if code.is_empty() {
            return Err(CliError::validation(format!(
                "Unknown key name: {}",
                self.name
            )));
        }

        if self.json {
            output_json(&LookupOutput {
                code: code.to_string(),
                name: &self.name,
            })
        } else {
            println!("{code}");
            Ok(())
        }
    }
}

impl ListArgs {
    fn execute(&self, table: &KeyCodeTable) -> CliResult<()> {
        let entries: Vec<_> = table
            .entries()
            .iter()
            .filter(|entry| {
                self.filter
                    .as_deref()
                    .map_or(true, |needle| entry.name.contains(needle))
            })
            .collect();

        if self.json {
            return output_json(&entries);
        }

        for entry in &entries {
            println!("{:<8} {}", entry.code, entry.name);
        }
        println!();
        println!("{} key codes", entries.len());
        Ok(())
    }
}
