// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup. Logs never go to the terminal the builder draws on.

use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Installs a subscriber writing to `log_path`, falling back to stderr.
pub fn setup(log_path: &Path) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let installed = match fs::OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(path = %log_path.display(), "logging initialized");
    }
}
