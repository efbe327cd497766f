// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

const CATALOG: &str = r#"{
  "incident": {
    "fields": [
      {"name": "number", "label": "Number", "type": "string"},
      {"name": "priority", "label": "Priority", "type": "integer", "mandatory": true},
      {"name": "state", "label": "State", "type": "choice",
       "choices": [{"value": "1", "label": "New"}, {"value": "2", "label": "In Progress"}]},
      {"name": "assigned_to", "label": "Assigned to", "type": "reference",
       "reference_table": "sys_user"},
      {"name": "opened_at", "label": "Opened", "type": "glide_date_time"}
    ],
    "records": [
      {"sys_id": "i1", "number": "INC001", "priority": 1, "state": "1"},
      {"sys_id": "i2", "number": "INC002", "priority": 3, "state": "2"}
    ]
  }
}"#;

const FILTERS: &str = r#"[
  {"name": "p1", "table": "incident", "query": "priority=1"},
  {"name": "open", "table": "incident", "query": "state=1^ORstate=2"},
  {"name": "mine", "table": "problem", "query": "assigned_to=u1"}
]"#;

/// The binary, isolated from the caller's state directory and colors.
pub fn nowq(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("nowq");
    cmd.env("NOWQ_STATE_DIR", state.path())
        .env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("NOWQ_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// An empty state directory.
pub fn empty_state() -> TempDir {
    TempDir::new().unwrap()
}

/// A state directory with a catalog and saved filters.
pub fn state() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("catalog.json"), CATALOG).unwrap();
    fs::write(temp.path().join("filters.json"), FILTERS).unwrap();
    temp
}
