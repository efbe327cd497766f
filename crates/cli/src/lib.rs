// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! nowq - build, validate, and explain encoded table queries.
//!
//! This crate is the `nowq` command-line driver for [`nowq_core`]. It
//! supplies the pieces the core leaves to its host:
//!
//! - [`catalog`] - a JSON file of table metadata and records
//! - [`store`] - saved filters in a JSON file
//! - [`config`] - `config.toml` and the state directory
//! - a crossterm terminal loop that drives the interactive builder

pub mod catalog;
mod cli;
pub mod colors;
mod commands;
pub mod config;
mod display;
mod env;
pub mod error;
pub mod help;
mod logging;
pub mod store;
mod terminal;

pub use cli::{Cli, Command, OutputFormat, SavedCommand};
pub use config::Config;
pub use error::{Error, Result};

/// Loads configuration, starts logging, and runs one command.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::setup(&config.log_path());
    tracing::debug!(state_dir = %config.state_dir().display(), "loaded config");

    match cli.command {
        Command::Build { table, load, save } => {
            commands::build::run(&config, &table, load.as_deref(), save.as_deref())
        }
        Command::Validate { query, output } => commands::validate::run(&query, output),
        Command::Explain {
            table,
            query,
            output,
        } => commands::explain::run(&config, &table, &query, output),
        Command::Fields { table, output } => commands::fields::run(&config, &table, output),
        Command::Saved(command) => commands::saved::run(&config, command),
    }
}
