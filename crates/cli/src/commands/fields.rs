// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use nowq_core::MetadataProvider;

use crate::catalog::JsonCatalog;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::display::format_fields;
use crate::error::Result;

pub fn run(config: &Config, table: &str, output: OutputFormat) -> Result<()> {
    let catalog = JsonCatalog::load(&config.catalog_path())?;
    let fields = catalog.field_metadata(table)?;
    match output {
        OutputFormat::Text => print!("{}", format_fields(&fields)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
    }
    Ok(())
}
