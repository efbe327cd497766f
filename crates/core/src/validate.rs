// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Condition and query validation.
//!
//! Problems are reported as [`ValidationIssue`] values, never as `Err`.
//! Only [`Severity::Error`] issues block a commit; warnings and info notes
//! are advisory.

use serde::Serialize;
use std::fmt;

use crate::compile::compile;
use crate::condition::{Condition, ConditionDraft};
use crate::datetime::{parse_instant, parse_range_expression};
use crate::field::{FieldDescriptor, FieldType};
use crate::grammar::Operator;

/// Values longer than this get a performance warning.
pub const MAX_VALUE_LEN: usize = 500;
/// Compiled queries longer than this get a performance warning.
pub const MAX_QUERY_LEN: usize = 2000;
pub const MAX_CONDITIONS: usize = 20;
pub const MAX_CONTAINS: usize = 5;
pub const MAX_OR_JOINS: usize = 3;

const BOOLEAN_TOKENS: &[&str] = &["true", "false", "1", "0", "yes", "no"];

const METACHARACTERS: &[char] = &['^', '=', '@', '(', ')'];

// Substring heuristics only. The backend does its own parsing; this list
// catches obvious paste accidents, it does not make a query safe.
/// The only script call compiled range queries contain, lowercased.
const COMPILED_SCRIPT_HELPER: &str = "gs.dategenerate(";

const BLOCKLIST: &[&str] = &[
    "drop table",
    "delete from",
    "insert into",
    "truncate table",
    "union select",
    "<script",
    "onerror=",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Validation,
    Parse,
    Syntax,
    Performance,
    Security,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    /// Field name, or `query` for whole-query issues.
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_index: Option<usize>,
}

impl ValidationIssue {
    fn new(
        severity: Severity,
        kind: IssueKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            severity,
            kind,
            subject: subject.into(),
            message: message.into(),
            suggestion: None,
            condition_index: None,
        }
    }

    pub fn error(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue::new(Severity::Error, kind, subject, message)
    }

    pub fn warning(
        kind: IssueKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue::new(Severity::Warning, kind, subject, message)
    }

    pub fn info(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue::new(Severity::Info, kind, subject, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.condition_index = Some(index);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition_index {
            Some(i) => write!(f, "{}: #{} {}: {}", self.severity, i + 1, self.subject, self.message)?,
            None => write!(f, "{}: {}: {}", self.severity, self.subject, self.message)?,
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  hint: {suggestion}")?;
        }
        Ok(())
    }
}

/// The outcome of validating a whole condition list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub compiled_preview: String,
}

impl ValidationReport {
    fn from_issues(issues: Vec<ValidationIssue>, compiled_preview: String) -> Self {
        ValidationReport {
            is_valid: !has_errors(&issues),
            issues,
            compiled_preview,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

/// Validates a draft that may still lack a field or operator.
pub fn validate_draft(draft: &ConditionDraft) -> Vec<ValidationIssue> {
    let Some(field) = &draft.field else {
        return vec![ValidationIssue::error(IssueKind::Validation, "condition", "no field selected")
            .with_suggestion("pick a field first")];
    };
    if draft.operator.is_none() {
        return vec![
            ValidationIssue::error(IssueKind::Validation, &field.name, "no operator selected")
                .with_suggestion("pick an operator for this field"),
        ];
    }
    match draft.to_condition() {
        Some(condition) => validate_condition(&condition),
        None => Vec::new(),
    }
}

/// Validates one condition against its field's type.
pub fn validate_condition(condition: &Condition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let field = &condition.field;
    let op = condition.operator;

    if field.name.trim().is_empty() {
        issues.push(
            ValidationIssue::error(IssueKind::Validation, "condition", "field name is empty")
                .with_suggestion("pick a field first"),
        );
        return issues;
    }

    check_compatibility(field, op, &mut issues);

    if !op.requires_value() {
        return issues;
    }

    if op == Operator::Between {
        check_range(condition, &mut issues);
        return issues;
    }

    let value = condition.value.trim();
    if value.is_empty() {
        issues.push(
            ValidationIssue::error(IssueKind::Validation, &field.name, "a value is required")
                .with_suggestion(format!("enter a value for {}", field.display_label())),
        );
        return issues;
    }

    if op.is_list() {
        let items: Vec<&str> = value.split(',').map(str::trim).collect();
        if items.iter().any(|item| item.is_empty()) {
            issues.push(
                ValidationIssue::error(IssueKind::Validation, &field.name, "list has an empty item")
                    .with_suggestion("separate values with single commas, e.g. 1,2,3"),
            );
        }
        for item in items.into_iter().filter(|i| !i.is_empty()) {
            check_value(field, item, &mut issues);
        }
    } else {
        check_value(field, value, &mut issues);
    }

    if field.field_type.is_free_text() && value.contains(METACHARACTERS) {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Validation,
                &field.name,
                "value contains query grammar characters (^ = @ ( ))",
            )
            .with_suggestion("the backend may split the value; remove those characters if unintended"),
        );
    }

    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Performance,
                &field.name,
                format!("value is {len} characters long"),
            )
            .with_suggestion("long values slow down matching; use a shorter distinctive fragment"),
        );
    }
    if let Some(max) = field.max_length {
        if len > max {
            issues.push(ValidationIssue::warning(
                IssueKind::Validation,
                &field.name,
                format!("value is longer than the field's maximum of {max} characters"),
            ));
        }
    }

    issues
}

fn check_compatibility(field: &FieldDescriptor, op: Operator, issues: &mut Vec<ValidationIssue>) {
    let suggestion = match field.field_type {
        FieldType::Reference
            if !(matches!(
                op,
                Operator::Eq | Operator::Ne | Operator::Contains | Operator::StartsWith
            ) || op.is_presence()) =>
        {
            Some("reference fields match with =, !=, CONTAINS or STARTSWITH")
        }
        FieldType::Date | FieldType::DateTime
            if !(op.is_comparison() || op.is_date_only() || op.is_presence()) =>
        {
            Some("date fields match with comparisons, BETWEEN or a date keyword")
        }
        FieldType::Integer | FieldType::Decimal if op.is_text_match() => {
            Some("numeric fields match with comparisons or IN")
        }
        FieldType::Boolean if !matches!(op, Operator::Eq | Operator::Ne) => {
            Some("boolean fields match with = or != only")
        }
        _ => None,
    };
    if let Some(suggestion) = suggestion {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Validation,
                &field.name,
                format!(
                    "operator {} is unusual for a {} field",
                    op.token(),
                    field.field_type
                ),
            )
            .with_suggestion(suggestion),
        );
    }
}

fn check_value(field: &FieldDescriptor, value: &str, issues: &mut Vec<ValidationIssue>) {
    match field.field_type {
        FieldType::Integer => {
            if value.parse::<i64>().is_err() {
                issues.push(parse_issue(field, value, "a whole number"));
            }
        }
        FieldType::Decimal => {
            let ok = value.chars().any(|c| c.is_ascii_digit())
                && value.parse::<f64>().map(f64::is_finite).unwrap_or(false);
            if !ok {
                issues.push(parse_issue(field, value, "a number"));
            }
        }
        FieldType::Boolean => {
            let lower = value.to_ascii_lowercase();
            if !BOOLEAN_TOKENS.contains(&lower.as_str()) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Parse,
                        &field.name,
                        format!("'{value}' is not a boolean"),
                    )
                    .with_suggestion("use true, false, 1, 0, yes or no"),
                );
            }
        }
        FieldType::Date | FieldType::DateTime => {
            if parse_instant(value).is_err() {
                issues.push(parse_issue(field, value, "a date"));
            }
        }
        FieldType::Choice => {
            if field.choices.is_empty() {
                issues.push(ValidationIssue::info(
                    IssueKind::Validation,
                    &field.name,
                    "choices were not loaded; value not checked",
                ));
            } else if !field.has_choice(value) {
                issues.push(
                    ValidationIssue::warning(
                        IssueKind::Validation,
                        &field.name,
                        format!("'{value}' is not a known choice"),
                    )
                    .with_suggestion("the server may accept it, but check the spelling"),
                );
            }
        }
        FieldType::Text | FieldType::LongText | FieldType::Reference => {}
    }
}

fn parse_issue(field: &FieldDescriptor, value: &str, expected: &str) -> ValidationIssue {
    let hint = match field.field_type {
        FieldType::Date | FieldType::DateTime => "use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
        FieldType::Integer => "enter digits only, optionally with a leading minus",
        _ => "enter a number such as 42 or -3.5",
    };
    ValidationIssue::error(
        IssueKind::Parse,
        &field.name,
        format!("'{value}' is not {expected}"),
    )
    .with_suggestion(hint)
}

fn check_range(condition: &Condition, issues: &mut Vec<ValidationIssue>) {
    let field = &condition.field;
    let bounds = match (condition.start, condition.end) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => parse_range_expression(&condition.value).ok(),
    };
    match bounds {
        None => issues.push(
            ValidationIssue::error(IssueKind::Parse, &field.name, "date range is incomplete")
                .with_suggestion("choose both a start and an end date"),
        ),
        Some((start, end)) if end < start => issues.push(
            ValidationIssue::error(IssueKind::Validation, &field.name, "range ends before it starts")
                .with_suggestion("pick an end date on or after the start date"),
        ),
        Some(_) => {}
    }
}

/// Syntax checks shared by compiled previews and hand-typed queries.
pub fn check_syntax(query: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let syntax = |message: &str, suggestion: &str| {
        ValidationIssue::error(IssueKind::Syntax, "query", message).with_suggestion(suggestion)
    };

    if query.starts_with('^') {
        issues.push(syntax("query starts with a combinator", "remove the leading ^"));
    }
    if query.ends_with('^') || query.ends_with("^OR") {
        issues.push(syntax("query ends with a combinator", "remove the trailing ^ or ^OR"));
    }
    if query.contains("^^") || query.contains("^OR^") {
        issues.push(syntax("doubled combinator", "join conditions with a single ^ or ^OR"));
    }

    let mut depth: i64 = 0;
    let mut balanced = true;
    for c in query.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    balanced = false;
                }
            }
            _ => {}
        }
    }
    if !balanced || depth != 0 {
        issues.push(syntax("unbalanced parentheses", "close every ( with a matching )"));
    }
    issues
}

/// Counts OR joins, ignoring `^ORDERBY` sort terms.
fn count_or_joins(query: &str) -> usize {
    query
        .match_indices("^OR")
        .filter(|(i, _)| !query[i + 3..].starts_with("DERBY"))
        .count()
}

fn check_query_shape(query: &str, issues: &mut Vec<ValidationIssue>) {
    issues.extend(check_syntax(query));
    let len = query.chars().count();
    if len > MAX_QUERY_LEN {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Performance,
                "query",
                format!("query is {len} characters long"),
            )
            .with_suggestion("very long queries may be truncated by the backend"),
        );
    }
    let or_joins = count_or_joins(query);
    if or_joins > MAX_OR_JOINS {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Performance,
                "query",
                format!("{or_joins} OR joins"),
            )
            .with_suggestion("consider IN for alternatives on the same field"),
        );
    }
}

/// Validates a whole condition list and compiles a preview of it.
pub fn validate_query(conditions: &[Condition]) -> ValidationReport {
    if conditions.is_empty() {
        let issue = ValidationIssue::error(
            IssueKind::Validation,
            "query",
            "at least one condition required",
        )
        .with_suggestion("add a condition before running the query");
        return ValidationReport::from_issues(vec![issue], String::new());
    }

    let mut issues: Vec<ValidationIssue> = conditions
        .iter()
        .enumerate()
        .flat_map(|(i, c)| validate_condition(c).into_iter().map(move |issue| issue.at(i)))
        .collect();

    let compiled = compile(conditions);
    check_query_shape(&compiled, &mut issues);

    if conditions.len() > MAX_CONDITIONS {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Performance,
                "query",
                format!("{} conditions", conditions.len()),
            )
            .with_suggestion("queries with many conditions can be slow; narrow the filter"),
        );
    }
    let contains = conditions
        .iter()
        .filter(|c| c.operator == Operator::Contains)
        .count();
    if contains > MAX_CONTAINS {
        issues.push(
            ValidationIssue::warning(
                IssueKind::Performance,
                "query",
                format!("{contains} CONTAINS conditions"),
            )
            .with_suggestion("substring matches cannot use indexes; prefer = or STARTSWITH"),
        );
    }

    ValidationReport::from_issues(issues, compiled)
}

/// Sanity checks for a hand-typed encoded query.
///
/// The substring blocklist is a heuristic that flags obvious script or SQL
/// fragments. It is not a security boundary.
pub fn validate_raw_query(query: &str) -> ValidationReport {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        let issue = ValidationIssue::error(IssueKind::Validation, "query", "query is empty")
            .with_suggestion("type at least one condition, e.g. active=true");
        return ValidationReport::from_issues(vec![issue], String::new());
    }

    let mut issues = Vec::new();
    check_query_shape(trimmed, &mut issues);

    let lower = trimmed.to_ascii_lowercase();
    let mut blocked: Vec<&str> = BLOCKLIST
        .iter()
        .copied()
        .filter(|needle| lower.contains(needle))
        .collect();
    if lower
        .match_indices("javascript:")
        .any(|(i, m)| !lower[i + m.len()..].starts_with(COMPILED_SCRIPT_HELPER))
    {
        blocked.push("javascript:");
    }
    for needle in blocked {
        issues.push(
            ValidationIssue::error(
                IssueKind::Security,
                "query",
                format!("query contains suspicious text '{needle}'"),
            )
            .with_suggestion("remove it; encoded queries never need it"),
        );
    }

    ValidationReport::from_issues(issues, trimmed.to_string())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
