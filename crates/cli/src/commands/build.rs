// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use nowq_core::{parse_encoded, BuilderEvent, ConditionBuilder, FilterStore, SavedFilter};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::JsonCatalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::JsonFilterStore;
use crate::terminal;

/// How long outstanding reference searches may run after the builder exits.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

pub fn run(config: &Config, table: &str, load: Option<&str>, save: Option<&str>) -> Result<()> {
    if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
        return Err(Error::TtyRequired);
    }

    let catalog = Arc::new(JsonCatalog::load(&config.catalog_path())?);
    let store = JsonFilterStore::new(config.filters_path());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    let mut builder = ConditionBuilder::from_metadata(table, catalog.as_ref(), config.builder.clone())
        .with_record_source(catalog.clone(), runtime.handle().clone());
    if let Some(name) = load {
        load_saved(&mut builder, &store, name)?;
    }

    let outcome = terminal::run(&mut builder);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match outcome? {
        BuilderEvent::Finished(query) => {
            if let Some(name) = save {
                store.save(SavedFilter {
                    name: name.to_string(),
                    table: table.to_string(),
                    query: query.clone(),
                })?;
                eprintln!("saved '{name}' for {table}");
            }
            println!("{query}");
            Ok(())
        }
        _ => Err(Error::Cancelled),
    }
}

/// Replaces the builder's conditions with a saved filter of its table.
pub(crate) fn load_saved(
    builder: &mut ConditionBuilder,
    store: &JsonFilterStore,
    name: &str,
) -> Result<()> {
    let table = builder.table().to_string();
    let saved = store
        .find(name, &table)?
        .ok_or_else(|| Error::SavedFilterNotFound {
            name: name.to_string(),
            table: table.clone(),
        })?;
    let conditions = parse_encoded(&saved.query, builder.fields())?;
    tracing::info!(name, table = %table, conditions = conditions.len(), "loaded saved filter");
    builder.set_conditions(conditions);
    Ok(())
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
