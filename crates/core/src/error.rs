// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for nowq-core operations.
//!
//! Condition-level and query-level problems are not errors: they are
//! reported as [`ValidationIssue`](crate::validate::ValidationIssue) values.
//! This enum covers collaborator failures and literal parsing.

use thiserror::Error;

/// All possible errors that can occur in nowq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("table not found: '{0}'\n  hint: check the table name and that it has discoverable fields")]
    TableNotFound(String),

    #[error("permission denied reading '{0}'\n  hint: ask an administrator for read access to the table")]
    PermissionDenied(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("cannot parse '{input}' as {expected}")]
    Parse {
        input: String,
        expected: &'static str,
    },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("empty query")]
    EmptyQuery,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for nowq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
