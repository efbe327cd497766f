// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "nowq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, check and explain encoded table queries")]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Read configuration from <path> instead of the state directory
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a filter interactively and print the encoded query
    #[command(after_help = colors::examples("\
Examples:
  nowq build incident                  Start from an empty filter
  nowq build incident --load p1        Edit the saved filter p1
  nowq build incident --save p1        Save the result as p1

Keys:
  Enter: choose  Esc: back  Ctrl-S: finish  Ctrl-U: undo  Ctrl-L: reset"))]
    Build {
        /// Table to filter
        #[arg(value_parser = non_empty_string)]
        table: String,

        /// Start from a saved filter
        #[arg(long, value_name = "NAME")]
        load: Option<String>,

        /// Save the finished filter under this name
        #[arg(long, value_name = "NAME", value_parser = non_empty_string)]
        save: Option<String>,
    },

    /// Check an encoded query for syntax and safety problems
    #[command(after_help = colors::examples("\
Examples:
  nowq validate 'priority=1^ORpriority=2'   Check a query
  nowq validate '^active=true' -o json      Report issues as JSON"))]
    Validate {
        /// Encoded query
        query: String,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show an encoded query as conditions and validate each one
    Explain {
        /// Table whose fields type the conditions
        #[arg(value_parser = non_empty_string)]
        table: String,

        /// Encoded query
        query: String,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List a table's fields and their operators
    Fields {
        #[arg(value_parser = non_empty_string)]
        table: String,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Manage saved filters
    #[command(subcommand)]
    Saved(SavedCommand),
}

#[derive(Subcommand)]
pub enum SavedCommand {
    /// List saved filters, optionally for one table
    List {
        table: Option<String>,
    },
    /// Search saved filter names and queries
    Search {
        #[arg(value_parser = non_empty_string)]
        text: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
