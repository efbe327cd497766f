// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use nowq_core::{BuilderConfig, FieldDescriptor, FieldType};
use tempfile::TempDir;

fn builder() -> ConditionBuilder {
    let fields = vec![
        FieldDescriptor::new("priority", FieldType::Integer).with_label("Priority"),
        FieldDescriptor::new("active", FieldType::Boolean),
    ];
    ConditionBuilder::new("incident", fields, BuilderConfig::default())
}

#[test]
fn load_saved_fills_the_builder() {
    let temp = TempDir::new().unwrap();
    let store = JsonFilterStore::new(temp.path().join("filters.json"));
    store
        .save(SavedFilter {
            name: "p1".to_string(),
            table: "incident".to_string(),
            query: "priority=1^ORactive=true".to_string(),
        })
        .unwrap();

    let mut b = builder();
    load_saved(&mut b, &store, "p1").unwrap();
    assert_eq!(b.conditions().len(), 2);
    assert_eq!(b.build_query(), "priority=1^ORactive=true");
    assert_eq!(b.conditions().iter().next().unwrap().field.label, "Priority");
}

#[test]
fn load_saved_is_scoped_to_the_table() {
    let temp = TempDir::new().unwrap();
    let store = JsonFilterStore::new(temp.path().join("filters.json"));
    store
        .save(SavedFilter {
            name: "p1".to_string(),
            table: "problem".to_string(),
            query: "priority=1".to_string(),
        })
        .unwrap();

    let err = load_saved(&mut builder(), &store, "p1").unwrap_err();
    assert!(matches!(err, Error::SavedFilterNotFound { .. }));
}
