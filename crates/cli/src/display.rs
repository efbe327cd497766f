// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering for command output.

use nowq_core::grammar::operators_for;
use nowq_core::{ConditionSet, FieldDescriptor, FieldType, SavedFilter, ValidationIssue, ValidationReport};

use crate::colors;

/// Formats one issue, e.g. `error: #2 priority: 'x' is not a whole number`.
pub fn format_issue(issue: &ValidationIssue) -> String {
    let position = issue
        .condition_index
        .map(|i| format!("#{} ", i + 1))
        .unwrap_or_default();
    let mut line = format!(
        "{}: {position}{}: {}",
        colors::severity(issue.severity),
        issue.subject,
        issue.message
    );
    if let Some(suggestion) = &issue.suggestion {
        line.push_str(&format!("\n  {} {suggestion}", colors::context("hint:")));
    }
    line
}

/// Formats a report: issues first, then a one-line verdict.
pub fn format_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for issue in &report.issues {
        out.push_str(&format_issue(issue));
        out.push('\n');
    }
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.is_valid {
        out.push_str(&format!("valid ({warnings} warning(s))"));
    } else {
        out.push_str(&format!("invalid ({errors} error(s), {warnings} warning(s))"));
    }
    out
}

/// Formats conditions as a numbered list with their joins.
pub fn format_conditions(conditions: &ConditionSet) -> String {
    let mut out = String::new();
    for (i, c) in conditions.iter().enumerate() {
        let join = c.next.map(|n| format!(" {n}")).unwrap_or_default();
        out.push_str(&format!("  {}. {}{join}\n", i + 1, c.summary()));
    }
    out
}

/// Formats field metadata with each field's legal operators.
pub fn format_fields(fields: &[FieldDescriptor]) -> String {
    let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for field in fields {
        let mut line = format!(
            "{:<width$}  {:<16} {}",
            field.name,
            field.field_type.as_str(),
            field.display_label()
        );
        if field.mandatory {
            line.push_str(" (mandatory)");
        }
        if let (FieldType::Reference, Some(table)) = (field.field_type, &field.reference_table) {
            line.push_str(&format!(" -> {table}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');

        let tokens: Vec<&str> = operators_for(field.field_type)
            .iter()
            .map(|op| op.token())
            .collect();
        out.push_str(&format!("    {} {}\n", colors::context("operators:"), tokens.join(" ")));
        if !field.choices.is_empty() {
            let choices: Vec<String> = field
                .choices
                .iter()
                .map(|c| format!("{} ({})", c.value, c.label))
                .collect();
            out.push_str(&format!("    {} {}\n", colors::context("choices:"), choices.join(", ")));
        }
    }
    out
}

/// Formats saved filters, one per line.
pub fn format_saved(filters: &[SavedFilter]) -> String {
    let width = filters.iter().map(|f| f.name.len()).max().unwrap_or(0);
    filters
        .iter()
        .map(|f| format!("{:<width$}  [{}]  {}\n", f.name, f.table, f.query))
        .collect()
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
