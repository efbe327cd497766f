// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::condition::{ConditionSet, LogicalOp};
use crate::field::Choice;
use chrono::NaiveDate;
use yare::parameterized;

fn cond(ft: FieldType, op: Operator, value: &str) -> Condition {
    Condition::new(FieldDescriptor::new("f", ft), op, value)
}

fn severities(issues: &[ValidationIssue]) -> Vec<Severity> {
    issues.iter().map(|i| i.severity).collect()
}

#[parameterized(
    gt = { Operator::Gt },
    contains = { Operator::Contains },
    is_empty = { Operator::IsEmpty },
    in_list = { Operator::In },
)]
fn boolean_warns_on_anything_but_equality(op: Operator) {
    let issues = validate_condition(&cond(FieldType::Boolean, op, "true"));
    assert!(issues
        .iter()
        .any(|i| i.severity == Severity::Warning && i.kind == IssueKind::Validation));
}

#[parameterized(
    eq = { Operator::Eq },
    ne = { Operator::Ne },
)]
fn boolean_accepts_equality(op: Operator) {
    assert!(validate_condition(&cond(FieldType::Boolean, op, "true")).is_empty());
}

#[parameterized(
    negative = { FieldType::Integer, "-12" },
    zero = { FieldType::Integer, "0" },
    decimal = { FieldType::Decimal, "3.25" },
    negative_decimal = { FieldType::Decimal, "-0.5" },
    integral_decimal = { FieldType::Decimal, "7" },
)]
fn numeric_values_pass(ft: FieldType, value: &str) {
    assert!(validate_condition(&cond(ft, Operator::Eq, value)).is_empty());
}

#[parameterized(
    word = { FieldType::Integer, "ten" },
    decimal_in_integer = { FieldType::Integer, "1.5" },
    trailing = { FieldType::Decimal, "12abc" },
    infinity = { FieldType::Decimal, "inf" },
    nan = { FieldType::Decimal, "NaN" },
)]
fn non_numeric_values_are_errors(ft: FieldType, value: &str) {
    let issues = validate_condition(&cond(ft, Operator::Eq, value));
    assert_eq!(severities(&issues), vec![Severity::Error]);
    assert_eq!(issues[0].kind, IssueKind::Parse);
    assert!(issues[0].suggestion.is_some());
}

#[parameterized(
    upper = { "TRUE" },
    yes = { "yes" },
    zero = { "0" },
)]
fn boolean_tokens_are_case_insensitive(value: &str) {
    assert!(validate_condition(&cond(FieldType::Boolean, Operator::Eq, value)).is_empty());
}

#[test]
fn boolean_rejects_other_tokens() {
    let issues = validate_condition(&cond(FieldType::Boolean, Operator::Eq, "maybe"));
    assert_eq!(severities(&issues), vec![Severity::Error]);
}

#[test]
fn date_value_must_parse() {
    assert!(validate_condition(&cond(FieldType::Date, Operator::Gt, "2024-01-15")).is_empty());
    let issues = validate_condition(&cond(FieldType::DateTime, Operator::Gt, "last tuesday"));
    assert_eq!(severities(&issues), vec![Severity::Error]);
}

#[test]
fn date_field_warns_on_text_operator() {
    let issues = validate_condition(&cond(FieldType::Date, Operator::Contains, "2024-01-15"));
    assert_eq!(severities(&issues), vec![Severity::Warning]);
}

#[test]
fn numeric_field_warns_on_text_operator() {
    let issues = validate_condition(&cond(FieldType::Integer, Operator::StartsWith, "1"));
    assert_eq!(severities(&issues), vec![Severity::Warning]);
}

#[test]
fn reference_field_warns_on_like() {
    let c = Condition::new(
        FieldDescriptor::new("caller_id", FieldType::Reference),
        Operator::Like,
        "fred",
    );
    let issues = validate_condition(&c);
    assert_eq!(severities(&issues), vec![Severity::Warning]);
    assert_eq!(issues[0].subject, "caller_id");
}

#[test]
fn value_less_operators_skip_value_checks() {
    assert!(validate_condition(&cond(FieldType::Integer, Operator::IsEmpty, "")).is_empty());
    assert!(validate_condition(&cond(FieldType::Date, Operator::LastWeek, "")).is_empty());
}

#[test]
fn missing_value_is_an_error() {
    let issues = validate_condition(&cond(FieldType::Text, Operator::Eq, "   "));
    assert_eq!(severities(&issues), vec![Severity::Error]);
}

#[test]
fn list_values_are_checked_per_item() {
    assert!(validate_condition(&cond(FieldType::Integer, Operator::In, "1, 2,3")).is_empty());

    let issues = validate_condition(&cond(FieldType::Integer, Operator::In, "1,x,3"));
    assert_eq!(severities(&issues), vec![Severity::Error]);
    assert!(issues[0].message.contains("'x'"));

    let issues = validate_condition(&cond(FieldType::Integer, Operator::NotIn, "1,,3"));
    assert_eq!(severities(&issues), vec![Severity::Error]);
}

#[test]
fn unknown_choice_is_only_a_warning() {
    let field = FieldDescriptor::new("state", FieldType::Choice)
        .with_choices(vec![Choice::new("1", "New"), Choice::new("2", "Active")]);
    let ok = Condition::new(field.clone(), Operator::Eq, "2");
    assert!(validate_condition(&ok).is_empty());

    let odd = Condition::new(field, Operator::Eq, "9");
    let issues = validate_condition(&odd);
    assert_eq!(severities(&issues), vec![Severity::Warning]);
}

#[test]
fn choice_without_loaded_choices_is_info() {
    let issues = validate_condition(&cond(FieldType::Choice, Operator::Eq, "9"));
    assert_eq!(severities(&issues), vec![Severity::Info]);
}

#[test]
fn metacharacters_in_free_text_warn() {
    let issues = validate_condition(&cond(FieldType::Text, Operator::Contains, "a^b"));
    assert_eq!(severities(&issues), vec![Severity::Warning]);
}

#[test]
fn long_value_is_a_performance_warning() {
    let value = "x".repeat(MAX_VALUE_LEN + 1);
    let issues = validate_condition(&cond(FieldType::Text, Operator::Contains, &value));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Performance);
}

#[test]
fn max_length_is_a_warning() {
    let c = Condition::new(
        FieldDescriptor::text("number").with_max_length(4),
        Operator::Eq,
        "INC0010001",
    );
    assert_eq!(severities(&validate_condition(&c)), vec![Severity::Warning]);
}

#[test]
fn reversed_range_is_an_error() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let c = Condition::range(
        FieldDescriptor::new("opened_at", FieldType::Date),
        d.and_hms_opt(12, 0, 0).unwrap(),
        d.and_hms_opt(8, 0, 0).unwrap(),
    );
    assert_eq!(severities(&validate_condition(&c)), vec![Severity::Error]);
}

#[test]
fn range_literal_value_is_accepted() {
    let c = cond(
        FieldType::Date,
        Operator::Between,
        "javascript:gs.dateGenerate('2024-01-01 00:00:00')@javascript:gs.dateGenerate('2024-01-31 23:59:59')",
    );
    assert!(validate_condition(&c).is_empty());
}

#[test]
fn draft_without_field_or_operator_is_an_error() {
    let mut draft = ConditionDraft::default();
    assert!(has_errors(&validate_draft(&draft)));
    draft.field = Some(FieldDescriptor::text("short_description"));
    let issues = validate_draft(&draft);
    assert!(issues[0].message.contains("operator"));
    draft.operator = Some(Operator::IsNotEmpty);
    assert!(validate_draft(&draft).is_empty());
}

#[test]
fn empty_query_is_invalid() {
    let report = validate_query(&[]);
    assert!(!report.is_valid);
    assert!(report.issues[0].message.contains("at least one condition"));
    assert_eq!(report.compiled_preview, "");
}

#[test]
fn query_annotates_condition_index() {
    let set = ConditionSet::from_vec(vec![
        cond(FieldType::Text, Operator::Eq, "ok"),
        cond(FieldType::Integer, Operator::Eq, "nope"),
    ]);
    let report = validate_query(set.as_slice());
    assert!(!report.is_valid);
    let err = report.errors().next().unwrap();
    assert_eq!(err.condition_index, Some(1));
    assert_eq!(report.compiled_preview, "f=ok^f=nope");
}

#[test]
fn many_conditions_warn_but_stay_valid() {
    let mut set = ConditionSet::new();
    for i in 0..25 {
        set.push(
            cond(FieldType::Integer, Operator::Eq, &i.to_string()),
            LogicalOp::And,
        );
    }
    let report = validate_query(set.as_slice());
    assert!(report.is_valid);
    assert!(report
        .warnings()
        .any(|w| w.kind == IssueKind::Performance && w.message.contains("25")));
}

#[test]
fn many_contains_and_or_joins_warn() {
    let mut set = ConditionSet::new();
    for _ in 0..6 {
        set.push(cond(FieldType::Text, Operator::Contains, "net"), LogicalOp::Or);
    }
    let report = validate_query(set.as_slice());
    assert!(report.is_valid);
    let messages: Vec<_> = report.warnings().map(|w| w.message.clone()).collect();
    assert!(messages.iter().any(|m| m.contains("CONTAINS")));
    assert!(messages.iter().any(|m| m.contains("OR joins")));
}

#[test]
fn metacharacter_value_surfaces_as_query_syntax_error() {
    let report = validate_query(&[cond(FieldType::Text, Operator::Eq, "a^")]);
    assert!(report.issues.iter().any(|i| i.kind == IssueKind::Syntax));
}

#[test]
fn raw_doubled_combinator() {
    let report = validate_raw_query("a=1^^b=2");
    assert!(!report.is_valid);
    assert!(report
        .errors()
        .any(|e| e.kind == IssueKind::Syntax && e.message.contains("doubled")));
}

#[test]
fn raw_unbalanced_parentheses() {
    let report = validate_raw_query("a=(1^b=2");
    assert!(report
        .errors()
        .any(|e| e.kind == IssueKind::Syntax && e.message.contains("unbalanced")));
}

#[parameterized(
    leading = { "^a=1" },
    trailing = { "a=1^" },
    trailing_or = { "a=1^OR" },
    doubled_or = { "a=1^OR^b=2" },
    close_first = { "a=)1(" },
)]
fn raw_syntax_errors(query: &str) {
    assert!(!validate_raw_query(query).is_valid);
}

#[test]
fn raw_empty_is_an_error() {
    assert!(!validate_raw_query("  ").is_valid);
}

#[parameterized(
    drop = { "name=x; DROP TABLE users" },
    script = { "name=<script>alert(1)</script>" },
    js = { "name=javascript:alert(1)" },
    js_other_helper = { "name=javascript:gs.getUser().deleteRecord()" },
    union = { "a=1 union select *" },
    onerror = { "name=<img onerror=x>" },
)]
fn raw_blocklist_flags_security_errors(query: &str) {
    let report = validate_raw_query(query);
    assert!(report.errors().any(|e| e.kind == IssueKind::Security));
}

#[test]
fn raw_accepts_compiled_range_helper() {
    let report = validate_raw_query(
        "opened_atBETWEENjavascript:gs.dateGenerate('2024-01-01 00:00:00')@javascript:gs.dateGenerate('2024-01-31 23:59:59')",
    );
    assert!(report.is_valid, "{:?}", report.issues);
}

#[test]
fn orderby_is_not_an_or_join() {
    let report = validate_raw_query("a=1^ORDERBYname^ORDERBYnumber^ORDERBYstate^ORDERBYx");
    assert!(report.warnings().all(|w| !w.message.contains("OR joins")));
}

#[test]
fn issue_display_includes_hint() {
    let issue = ValidationIssue::error(IssueKind::Parse, "priority", "'x' is not a number")
        .with_suggestion("enter digits")
        .at(0);
    assert_eq!(
        issue.to_string(),
        "error: #1 priority: 'x' is not a number\n  hint: enter digits"
    );
}
