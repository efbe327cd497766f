// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A file-backed table catalog.
//!
//! The catalog is a JSON object keyed by table name:
//!
//! ```json
//! {
//!   "incident": {
//!     "fields": [{"name": "priority", "label": "Priority", "type": "integer"}],
//!     "records": [{"sys_id": "i1", "priority": 1}]
//!   }
//! }
//! ```
//!
//! It serves field metadata to the builder and answers record listings by
//! evaluating encoded queries locally. `^OR` binds tighter than `^`, so a
//! query is a conjunction of OR-groups.

use chrono::{NaiveDate, NaiveDateTime};
use nowq_core::datetime::parse_instant;
use nowq_core::range::keyword_window;
use nowq_core::{
    parse_encoded, Clock, Condition, ConditionSet, FieldDescriptor, ListParams, LogicalOp,
    MetadataProvider, Operator, Record, RecordSource, SystemClock,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogTable {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub records: Vec<Record>,
}

pub struct JsonCatalog {
    tables: BTreeMap<String, CatalogTable>,
    clock: Box<dyn Clock>,
}

impl JsonCatalog {
    /// Loads a catalog file. A missing file is an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no catalog file, using an empty catalog");
            return Ok(JsonCatalog::from_tables(BTreeMap::new()));
        }
        let content = fs::read_to_string(path)?;
        let tables = serde_json::from_str(&content).map_err(|e| Error::Catalog {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(JsonCatalog::from_tables(tables))
    }

    pub fn from_tables(tables: BTreeMap<String, CatalogTable>) -> Self {
        JsonCatalog {
            tables,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    fn table(&self, name: &str) -> nowq_core::Result<&CatalogTable> {
        self.tables
            .get(name)
            .ok_or_else(|| nowq_core::Error::TableNotFound(name.to_string()))
    }
}

impl MetadataProvider for JsonCatalog {
    fn field_metadata(&self, table: &str) -> nowq_core::Result<Vec<FieldDescriptor>> {
        Ok(self.table(table)?.fields.clone())
    }
}

impl RecordSource for JsonCatalog {
    fn list(&self, table: &str, params: &ListParams) -> nowq_core::Result<Vec<Record>> {
        let entry = self.table(table)?;
        let conditions = if params.query.trim().is_empty() {
            ConditionSet::new()
        } else {
            parse_encoded(&params.query, &entry.fields)?
        };
        let today = self.clock.now().date();
        let limit = if params.limit == 0 {
            usize::MAX
        } else {
            params.limit
        };
        let records: Vec<Record> = entry
            .records
            .iter()
            .filter(|record| matches(&conditions, record, today))
            .take(limit)
            .map(|record| project(record, &params.fields))
            .collect();
        tracing::debug!(table, query = %params.query, count = records.len(), "listed records");
        Ok(records)
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(k, _)| fields.contains(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Evaluates a condition list against one record.
pub fn matches(conditions: &ConditionSet, record: &Record, today: NaiveDate) -> bool {
    let mut group_hit = false;
    for condition in conditions {
        group_hit |= condition_matches(condition, record, today);
        if condition.next == Some(LogicalOp::Or) {
            continue;
        }
        if !group_hit {
            return false;
        }
        group_hit = false;
    }
    true
}

/// The stored value of a column. Reference columns may be
/// `{"value": …, "display_value": …}` objects; the raw value wins.
fn raw_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => {
            return map
                .get("value")
                .and_then(raw_text)
                .or_else(|| map.get("display_value").and_then(raw_text));
        }
        Value::Null | Value::Array(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn instant_of(text: &str) -> Option<NaiveDateTime> {
    parse_instant(text).ok()
}

fn equal(actual: &str, expected: &str) -> bool {
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => actual == expected,
    }
}

fn compare(actual: &str, expected: &str) -> Option<Ordering> {
    if let (Ok(a), Ok(b)) = (actual.parse::<f64>(), expected.parse::<f64>()) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (instant_of(actual), instant_of(expected)) {
        return Some(a.cmp(&b));
    }
    Some(actual.cmp(expected))
}

fn condition_matches(condition: &Condition, record: &Record, today: NaiveDate) -> bool {
    let actual = record.get(&condition.field.name).and_then(raw_text);
    let op = condition.operator;

    match op {
        Operator::IsEmpty => return actual.is_none(),
        Operator::IsNotEmpty => return actual.is_some(),
        _ => {}
    }
    if op.is_date_keyword() {
        let window = keyword_window(op, today);
        let instant = actual.as_deref().and_then(instant_of);
        return match (window, instant) {
            (Some((start, end)), Some(at)) => start <= at && at <= end,
            _ => false,
        };
    }
    if op == Operator::Between {
        let instant = actual.as_deref().and_then(instant_of);
        return match (condition.start, condition.end, instant) {
            (Some(start), Some(end), Some(at)) => start <= at && at <= end,
            _ => false,
        };
    }

    let Some(actual) = actual else {
        return matches!(op, Operator::Ne | Operator::DoesNotContain | Operator::NotIn);
    };
    let expected = condition.value.as_str();
    let haystack = actual.to_lowercase();
    let needle = expected.to_lowercase();
    let in_list = || expected.split(',').map(str::trim).any(|v| equal(&actual, v));

    match op {
        Operator::Eq => equal(&actual, expected),
        Operator::Ne => !equal(&actual, expected),
        Operator::Contains | Operator::Like => haystack.contains(&needle),
        Operator::DoesNotContain => !haystack.contains(&needle),
        Operator::StartsWith => haystack.starts_with(&needle),
        Operator::EndsWith => haystack.ends_with(&needle),
        Operator::Gt => compare(&actual, expected) == Some(Ordering::Greater),
        Operator::Ge => matches!(
            compare(&actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => compare(&actual, expected) == Some(Ordering::Less),
        Operator::Le => matches!(
            compare(&actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::In => in_list(),
        Operator::NotIn => !in_list(),
        _ => false,
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
