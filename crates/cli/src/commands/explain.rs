// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use nowq_core::{
    parse_encoded, validate_query, ConditionSet, FieldDescriptor, MetadataProvider,
    ValidationReport,
};
use serde::Serialize;

use crate::catalog::JsonCatalog;
use crate::cli::OutputFormat;
use crate::colors;
use crate::config::Config;
use crate::display::{format_conditions, format_report};
use crate::error::Result;

use super::fail_on_errors;

#[derive(Debug, Serialize)]
struct ExplainOutput<'a> {
    table: &'a str,
    conditions: &'a ConditionSet,
    report: &'a ValidationReport,
}

pub fn run(config: &Config, table: &str, query: &str, output: OutputFormat) -> Result<()> {
    let catalog = JsonCatalog::load(&config.catalog_path())?;
    let fields = fields_or_text(&catalog, table);
    let (conditions, report) = explain(query, &fields)?;

    match output {
        OutputFormat::Text => {
            println!("{}", colors::header("Conditions:"));
            print!("{}", format_conditions(&conditions));
            println!("{} {}", colors::context("compiled:"), report.compiled_preview);
            println!("{}", format_report(&report));
        }
        OutputFormat::Json => {
            let out = ExplainOutput {
                table,
                conditions: &conditions,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    fail_on_errors(&report)
}

/// Field metadata, or none when the table is unknown; unknown field names
/// are then read as text.
fn fields_or_text(catalog: &JsonCatalog, table: &str) -> Vec<FieldDescriptor> {
    match catalog.field_metadata(table) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(table, error = %e, "no metadata, explaining with text fields");
            eprintln!("note: no field metadata for {table}; fields are treated as text");
            Vec::new()
        }
    }
}

/// Decompiles `query` and validates the resulting conditions.
pub(crate) fn explain(
    query: &str,
    fields: &[FieldDescriptor],
) -> Result<(ConditionSet, ValidationReport)> {
    let conditions = parse_encoded(query, fields)?;
    let report = validate_query(conditions.as_slice());
    Ok((conditions, report))
}

#[cfg(test)]
#[path = "explain_tests.rs"]
mod tests;
