// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors of the nowq command line.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] nowq_core::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("the interactive builder requires a terminal (TTY)\n  hint: use 'nowq validate' or 'nowq explain' in scripts")]
    TtyRequired,

    #[error("saved filter '{name}' not found for table {table}\n  hint: run 'nowq saved list {table}' to see saved filters")]
    SavedFilterNotFound { name: String, table: String },

    #[error("query has {errors} error(s)")]
    InvalidQuery { errors: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error in {path}: {reason}")]
    Catalog { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for nowq operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
