// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn partial_builder_table_keeps_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "[builder]\nadvanced_date_picker = false\nsearch_debounce_ms = 100\n",
    )
    .unwrap();

    let config = Config::load_file(&path).unwrap();
    assert!(!config.builder.advanced_date_picker);
    assert_eq!(config.builder.search_debounce_ms, 100);
    assert_eq!(config.builder.reference_min_chars, 2);
    assert!(config.builder.show_preview);
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "catalog = \"data/catalog.json\"\nfilters = \"/abs/filters.json\"\n").unwrap();

    let config = Config::load_file(&path).unwrap();
    assert_eq!(config.catalog_path(), temp.path().join("data/catalog.json"));
    assert_eq!(config.filters_path(), PathBuf::from("/abs/filters.json"));
}

#[test]
fn unparseable_file_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[builder\n").unwrap();

    let err = Config::load_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("failed to parse"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = Config::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn defaults_live_in_state_dir() {
    let mut config = Config::default();
    config.state_dir = PathBuf::from("/state");
    assert_eq!(config.catalog_path(), PathBuf::from("/state/catalog.json"));
    assert_eq!(config.filters_path(), PathBuf::from("/state/filters.json"));
    assert_eq!(config.log_path(), PathBuf::from("/state/nowq.log"));
}
