// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Saved filters persisted as a JSON array.

use nowq_core::provider::filter_matches;
use nowq_core::{FilterStore, SavedFilter};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFilterStore {
    path: PathBuf,
}

impl JsonFilterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finds a saved filter by name within one table.
    pub fn find(&self, name: &str, table: &str) -> nowq_core::Result<Option<SavedFilter>> {
        Ok(self
            .read()?
            .into_iter()
            .find(|f| f.name == name && f.table == table))
    }

    fn read(&self) -> nowq_core::Result<Vec<SavedFilter>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, filters: &[SavedFilter]) -> nowq_core::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(filters)?;
        fs::write(&self.path, content + "\n")?;
        Ok(())
    }
}

impl FilterStore for JsonFilterStore {
    fn save(&self, filter: SavedFilter) -> nowq_core::Result<()> {
        let mut filters = self.read()?;
        filters.retain(|f| !(f.name == filter.name && f.table == filter.table));
        tracing::info!(name = %filter.name, table = %filter.table, "saving filter");
        filters.push(filter);
        self.write(&filters)
    }

    fn list(&self, table: Option<&str>) -> nowq_core::Result<Vec<SavedFilter>> {
        Ok(self
            .read()?
            .into_iter()
            .filter(|f| table.map_or(true, |t| f.table == t))
            .collect())
    }

    fn search(&self, text: &str) -> nowq_core::Result<Vec<SavedFilter>> {
        Ok(self
            .read()?
            .into_iter()
            .filter(|f| filter_matches(f, text))
            .collect())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
