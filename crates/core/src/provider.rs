// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator traits the engine depends on.
//!
//! The engine never talks to a backend directly. Drivers supply a
//! [`MetadataProvider`] for field descriptors, a [`RecordSource`] for
//! reference searches, and optionally a [`FilterStore`] for saved filters.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::error::Result;
use crate::field::FieldDescriptor;

/// One record as returned by the backend.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Parameters of a record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Encoded query filter. Empty lists everything.
    pub query: String,
    /// Columns to return. Empty returns all.
    pub fields: Vec<String>,
    pub limit: usize,
}

/// Loads field metadata for a table.
pub trait MetadataProvider {
    /// Returns the table's fields in display order.
    ///
    /// Fails with [`Error::TableNotFound`](crate::Error::TableNotFound) or
    /// [`Error::PermissionDenied`](crate::Error::PermissionDenied) when the
    /// table is inaccessible.
    fn field_metadata(&self, table: &str) -> Result<Vec<FieldDescriptor>>;
}

/// Lists records. Called from a blocking worker thread.
pub trait RecordSource: Send + Sync {
    fn list(&self, table: &str, params: &ListParams) -> Result<Vec<Record>>;
}

/// A named, persisted encoded query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub name: String,
    pub table: String,
    pub query: String,
}

/// Persists saved filters.
pub trait FilterStore {
    /// Saves `filter`, replacing any filter with the same name and table.
    fn save(&self, filter: SavedFilter) -> Result<()>;
    /// Lists filters, optionally restricted to one table.
    fn list(&self, table: Option<&str>) -> Result<Vec<SavedFilter>>;
    /// Case-insensitive search over names and queries.
    fn search(&self, text: &str) -> Result<Vec<SavedFilter>>;
}

/// Case-insensitive match of a saved filter against search text.
pub fn filter_matches(filter: &SavedFilter, text: &str) -> bool {
    let needle = text.to_lowercase();
    filter.name.to_lowercase().contains(&needle) || filter.query.to_lowercase().contains(&needle)
}

/// In-memory [`FilterStore`].
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    filters: Mutex<Vec<SavedFilter>>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        MemoryFilterStore::default()
    }

    fn with_filters<T>(&self, f: impl FnOnce(&mut Vec<SavedFilter>) -> T) -> T {
        match self.filters.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl FilterStore for MemoryFilterStore {
    fn save(&self, filter: SavedFilter) -> Result<()> {
        self.with_filters(|filters| {
            filters.retain(|f| !(f.name == filter.name && f.table == filter.table));
            filters.push(filter);
        });
        Ok(())
    }

    fn list(&self, table: Option<&str>) -> Result<Vec<SavedFilter>> {
        Ok(self.with_filters(|filters| {
            filters
                .iter()
                .filter(|f| table.map_or(true, |t| f.table == t))
                .cloned()
                .collect()
        }))
    }

    fn search(&self, text: &str) -> Result<Vec<SavedFilter>> {
        Ok(self.with_filters(|filters| {
            filters
                .iter()
                .filter(|f| filter_matches(f, text))
                .cloned()
                .collect()
        }))
    }
}

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
