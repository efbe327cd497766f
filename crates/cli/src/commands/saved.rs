// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use nowq_core::{FilterStore, SavedFilter};

use crate::cli::SavedCommand;
use crate::config::Config;
use crate::display::format_saved;
use crate::error::Result;
use crate::store::JsonFilterStore;

pub fn run(config: &Config, command: SavedCommand) -> Result<()> {
    let store = JsonFilterStore::new(config.filters_path());
    let filters = match command {
        SavedCommand::List { table } => store.list(table.as_deref())?,
        SavedCommand::Search { text } => store.search(&text)?,
    };
    print_filters(&filters);
    Ok(())
}

fn print_filters(filters: &[SavedFilter]) {
    if filters.is_empty() {
        println!("no saved filters");
    } else {
        print!("{}", format_saved(filters));
    }
}
