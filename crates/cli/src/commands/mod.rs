// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod build;
pub mod explain;
pub mod fields;
pub mod saved;
pub mod validate;

use nowq_core::ValidationReport;

use crate::error::{Error, Result};

/// Fails with [`Error::InvalidQuery`] when the report has errors, so the
/// process exits non-zero after the report is printed.
pub(crate) fn fail_on_errors(report: &ValidationReport) -> Result<()> {
    match report.errors().count() {
        0 => Ok(()),
        errors => Err(Error::InvalidQuery { errors }),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
