// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use nowq_core::validate_raw_query;

use crate::cli::OutputFormat;
use crate::display::format_report;
use crate::error::Result;

use super::fail_on_errors;

pub fn run(query: &str, output: OutputFormat) -> Result<()> {
    let report = validate_raw_query(query);
    tracing::debug!(valid = report.is_valid, issues = report.issues.len(), "validated raw query");
    match output {
        OutputFormat::Text => println!("{}", format_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    fail_on_errors(&report)
}
