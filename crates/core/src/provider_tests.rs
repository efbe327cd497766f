// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;

fn saved(name: &str, table: &str, query: &str) -> SavedFilter {
    SavedFilter {
        name: name.to_string(),
        table: table.to_string(),
        query: query.to_string(),
    }
}

#[test]
fn save_replaces_same_name_and_table() {
    let store = MemoryFilterStore::new();
    store.save(saved("mine", "incident", "active=true")).unwrap();
    store.save(saved("mine", "problem", "active=true")).unwrap();
    store.save(saved("mine", "incident", "active=false")).unwrap();

    let incidents = store.list(Some("incident")).unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].query, "active=false");
    assert_eq!(store.list(None).unwrap().len(), 2);
}

#[test]
fn search_matches_name_or_query() {
    let store = MemoryFilterStore::new();
    store.save(saved("P1 open", "incident", "priority=1")).unwrap();
    store.save(saved("network", "incident", "categoryCONTAINSNetwork")).unwrap();

    assert_eq!(store.search("p1").unwrap().len(), 1);
    assert_eq!(store.search("NETWORK").unwrap().len(), 1);
    assert!(store.search("hardware").unwrap().is_empty());
}

#[test]
fn fixed_clock_is_fixed() {
    let instant = NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let clock = FixedClock(instant);
    assert_eq!(clock.now(), instant);
    assert_eq!(clock.now(), clock.now());
}
