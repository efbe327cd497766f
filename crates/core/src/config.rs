// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Builder configuration.
//!
//! Passed explicitly to [`ConditionBuilder`](crate::builder::ConditionBuilder);
//! there is no global state. Every field has a serde default so a partial
//! `[builder]` table in a config file is enough.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Use the calendar and range pickers for date fields (default: true).
    /// When false, dates are typed as text.
    #[serde(default = "default_true")]
    pub advanced_date_picker: bool,
    /// Offer hour/minute/second entry after picking a day (default: true).
    #[serde(default = "default_true")]
    pub show_time: bool,
    /// Allow a date range that starts and ends on the same day (default: true).
    #[serde(default = "default_true")]
    pub allow_same_day_range: bool,
    /// Show the compiled query under the builder (default: true).
    #[serde(default = "default_true")]
    pub show_preview: bool,
    /// Show the validation panel (default: false).
    #[serde(default)]
    pub show_validation: bool,
    /// Characters typed before a reference search starts (default: 2).
    #[serde(default = "default_reference_min_chars")]
    pub reference_min_chars: usize,
    /// Maximum reference candidates fetched (default: 20).
    #[serde(default = "default_reference_limit")]
    pub reference_limit: usize,
    /// Reference search timeout in milliseconds (default: 5000).
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
    /// Delay before a reference search is sent, in milliseconds (default: 250).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_reference_min_chars() -> usize {
    2
}

fn default_reference_limit() -> usize {
    20
}

fn default_search_timeout_ms() -> u64 {
    5000
}

fn default_search_debounce_ms() -> u64 {
    250
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            advanced_date_picker: true,
            show_time: true,
            allow_same_day_range: true,
            show_preview: true,
            show_validation: false,
            reference_min_chars: default_reference_min_chars(),
            reference_limit: default_reference_limit(),
            search_timeout_ms: default_search_timeout_ms(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl BuilderConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
