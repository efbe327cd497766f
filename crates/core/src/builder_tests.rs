// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::{Error, Result};
use crate::field::Choice;
use crate::grammar::operators_for;
use crate::provider::{FixedClock, ListParams, Record};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use yare::parameterized;

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("short_description").with_label("Short description"),
        FieldDescriptor::new("priority", FieldType::Integer).with_label("Priority"),
        FieldDescriptor::new("active", FieldType::Boolean).with_label("Active"),
        FieldDescriptor::new("opened_at", FieldType::DateTime).with_label("Opened"),
        FieldDescriptor::new("due_date", FieldType::Date).with_label("Due date"),
        FieldDescriptor::new("state", FieldType::Choice)
            .with_label("State")
            .with_choices(vec![
                Choice::new("1", "New"),
                Choice::new("2", "In Progress"),
                Choice::new("3", "Closed"),
            ]),
        FieldDescriptor::new("assigned_to", FieldType::Reference)
            .with_label("Assigned to")
            .with_reference("sys_user"),
    ]
}

fn builder() -> ConditionBuilder {
    ConditionBuilder::new("incident", fields(), BuilderConfig::default()).with_clock(FixedClock(now()))
}

fn key(b: &mut ConditionBuilder, key: Key) -> BuilderEvent {
    b.update(Message::Key(key))
}

fn type_text(b: &mut ConditionBuilder, text: &str) {
    for c in text.chars() {
        key(b, Key::Char(c));
    }
}

fn pick_field(b: &mut ConditionBuilder, name: &str) {
    assert_eq!(b.stage(), Stage::FieldSelection);
    type_text(b, name);
    key(b, Key::Enter);
    assert_eq!(b.stage(), Stage::OperatorSelection);
    assert_eq!(b.draft().field.as_ref().unwrap().name, name);
}

fn pick_operator(b: &mut ConditionBuilder, op: Operator) -> BuilderEvent {
    let field_type = b.draft().field.as_ref().unwrap().field_type;
    let index = operators_for(field_type).iter().position(|o| *o == op).unwrap();
    for _ in 0..index {
        key(b, Key::Down);
    }
    key(b, Key::Enter)
}

fn add_typed(b: &mut ConditionBuilder, field: &str, op: Operator, value: &str) -> BuilderEvent {
    pick_field(b, field);
    pick_operator(b, op);
    assert_eq!(b.stage(), Stage::ValueInput);
    type_text(b, value);
    key(b, Key::Enter)
}

#[test]
fn first_condition_commits_without_logical_operator() {
    let mut b = builder();
    assert_eq!(add_typed(&mut b, "priority", Operator::Eq, "1"), BuilderEvent::Committed(1));
    assert_eq!(b.stage(), Stage::FieldSelection);
    assert_eq!(b.build_query(), "priority=1");
    assert!(b.report().is_valid);
}

#[parameterized(
    and_key = { Key::Char('a'), "priority=1^active=true" },
    or_key = { Key::Char('o'), "priority=1^ORactive=true" },
    enter_defaults_to_and = { Key::Enter, "priority=1^active=true" },
)]
fn second_condition_asks_how_to_join(join: Key, expected: &str) {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    assert_eq!(add_typed(&mut b, "active", Operator::Eq, "true"), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::LogicalOperator);
    assert_eq!(key(&mut b, join), BuilderEvent::Committed(2));
    assert_eq!(b.build_query(), expected);
}

#[test]
fn invalid_value_stays_in_value_stage() {
    let mut b = builder();
    assert_eq!(add_typed(&mut b, "priority", Operator::Eq, "abc"), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::ValueInput);
    assert!(b.notice().unwrap().contains("whole number"));
    assert!(b.conditions().is_empty());

    for _ in 0..3 {
        key(&mut b, Key::Backspace);
    }
    type_text(&mut b, "2");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "priority=2");
}

#[test]
fn empty_value_is_rejected() {
    let mut b = builder();
    assert_eq!(add_typed(&mut b, "short_description", Operator::Contains, "  "), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::ValueInput);
    assert!(b.notice().is_some());
}

#[test]
fn valueless_operator_skips_value_stage() {
    let mut b = builder();
    pick_field(&mut b, "short_description");
    assert_eq!(pick_operator(&mut b, Operator::IsEmpty), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "short_descriptionISEMPTY");
}

#[test]
fn date_keyword_skips_value_stage() {
    let mut b = builder();
    pick_field(&mut b, "opened_at");
    assert_eq!(pick_operator(&mut b, Operator::ThisWeek), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "opened_atTHISWEEK");
}

#[test]
fn choice_list_marks_multiple_values() {
    let mut b = builder();
    pick_field(&mut b, "state");
    pick_operator(&mut b, Operator::In);
    assert_eq!(b.stage(), Stage::ChoiceSelection);
    key(&mut b, Key::Char(' '));
    key(&mut b, Key::Down);
    key(&mut b, Key::Char(' '));
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "stateIN1,2");
    let condition = b.conditions().last().unwrap();
    assert_eq!(condition.summary(), "State is one of New, In Progress");
}

#[test]
fn choice_single_uses_cursor() {
    let mut b = builder();
    pick_field(&mut b, "state");
    pick_operator(&mut b, Operator::Ne);
    key(&mut b, Key::Up);
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "state!=3");
}

#[test]
fn offline_reference_uses_typed_text() {
    let mut b = builder();
    pick_field(&mut b, "assigned_to");
    pick_operator(&mut b, Operator::Eq);
    assert_eq!(b.stage(), Stage::ReferenceSearch);
    type_text(&mut b, "abc123");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "assigned_to=abc123");
}

#[test]
fn date_field_calendar_yields_date() {
    let mut b = builder();
    pick_field(&mut b, "due_date");
    pick_operator(&mut b, Operator::Eq);
    assert_eq!(b.stage(), Stage::Calendar);
    key(&mut b, Key::Right);
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "due_date=2024-03-15");
}

#[test]
fn datetime_calendar_goes_through_time() {
    let mut b = builder();
    pick_field(&mut b, "opened_at");
    pick_operator(&mut b, Operator::Gt);
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::Calendar);
    type_text(&mut b, "8");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "opened_at>2024-03-14 08:00:00");
}

#[test]
fn between_uses_range_picker_presets() {
    let mut b = builder();
    pick_field(&mut b, "opened_at");
    pick_operator(&mut b, Operator::Between);
    assert_eq!(b.stage(), Stage::DateRange);
    key(&mut b, Key::Tab);
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    let condition = b.conditions().last().unwrap();
    assert!(condition.start.is_some() && condition.end.is_some());
    assert!(b.build_query().starts_with("opened_atBETWEENjavascript:gs.dateGenerate('"));
}

#[test]
fn between_with_typed_dates() {
    let mut b = builder();
    key(&mut b, Key::Ctrl('t'));
    assert!(!b.advanced_dates());
    pick_field(&mut b, "opened_at");
    pick_operator(&mut b, Operator::Between);
    assert_eq!(b.stage(), Stage::DualDateInput);

    type_text(&mut b, "2024-01-01");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Continue);
    type_text(&mut b, "2024-01-31");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(
        b.build_query(),
        "opened_atBETWEENjavascript:gs.dateGenerate('2024-01-01 00:00:00')@javascript:gs.dateGenerate('2024-01-31 23:59:59')"
    );
}

#[parameterized(
    reversed = { "2024-02-01", "2024-01-01" },
    unparseable = { "2024-01-01", "soon" },
)]
fn typed_range_errors_stay_in_stage(start: &str, end: &str) {
    let mut b = builder();
    key(&mut b, Key::Ctrl('t'));
    pick_field(&mut b, "due_date");
    pick_operator(&mut b, Operator::Between);
    type_text(&mut b, start);
    key(&mut b, Key::Enter);
    type_text(&mut b, end);
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::DualDateInput);
    assert!(b.notice().is_some());
    assert!(b.conditions().is_empty());
}

#[test]
fn toggling_date_entry_swaps_the_value_stage() {
    let mut b = builder();
    pick_field(&mut b, "due_date");
    pick_operator(&mut b, Operator::Lt);
    assert_eq!(b.stage(), Stage::Calendar);
    key(&mut b, Key::Ctrl('t'));
    assert_eq!(b.stage(), Stage::ValueInput);
    type_text(&mut b, "2024-12-31");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "due_date<2024-12-31");
}

#[test]
fn esc_walks_back_then_cancels() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    pick_field(&mut b, "priority");
    pick_operator(&mut b, Operator::Gt);
    assert_eq!(key(&mut b, Key::Esc), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::OperatorSelection);
    assert_eq!(key(&mut b, Key::Esc), BuilderEvent::Continue);
    assert_eq!(b.stage(), Stage::FieldSelection);
    assert!(b.draft().field.is_none());

    assert_eq!(key(&mut b, Key::Esc), BuilderEvent::Cancelled);
    assert!(!b.is_active());
    assert!(b.conditions().is_empty());
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Continue);
}

#[test]
fn esc_from_logical_operator_returns_to_value() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    add_typed(&mut b, "priority", Operator::Eq, "2");
    assert_eq!(b.stage(), Stage::LogicalOperator);
    key(&mut b, Key::Esc);
    assert_eq!(b.stage(), Stage::ValueInput);
    type_text(&mut b, "0");
    key(&mut b, Key::Enter);
    assert_eq!(key(&mut b, Key::Char('o')), BuilderEvent::Committed(2));
    assert_eq!(b.build_query(), "priority=1^ORpriority=20");
}

#[test]
fn ctrl_u_removes_last_condition() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    add_typed(&mut b, "active", Operator::Eq, "true");
    key(&mut b, Key::Char('o'));
    key(&mut b, Key::Ctrl('u'));
    assert_eq!(b.conditions().len(), 1);
    assert_eq!(b.build_query(), "priority=1");
    assert!(b.notice().unwrap().starts_with("removed:"));
    key(&mut b, Key::Ctrl('u'));
    key(&mut b, Key::Ctrl('u'));
    assert_eq!(b.notice(), Some("nothing to remove"));
}

#[test]
fn ctrl_l_resets_everything() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    pick_field(&mut b, "active");
    key(&mut b, Key::Ctrl('l'));
    assert!(b.conditions().is_empty());
    assert_eq!(b.stage(), Stage::FieldSelection);
    assert!(b.draft().field.is_none());
    assert!(b.is_active());
}

#[test]
fn ctrl_s_needs_a_condition() {
    let mut b = builder();
    assert_eq!(key(&mut b, Key::Ctrl('s')), BuilderEvent::Continue);
    assert!(b.is_active());
    assert!(b.notice().is_some());

    add_typed(&mut b, "priority", Operator::Ge, "3");
    assert_eq!(
        key(&mut b, Key::Ctrl('s')),
        BuilderEvent::Finished("priority>=3".to_string())
    );
    assert!(!b.is_active());
    assert_eq!(b.conditions().len(), 1);
}

#[test]
fn ctrl_c_cancels_from_any_stage() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    pick_field(&mut b, "state");
    assert_eq!(key(&mut b, Key::Ctrl('c')), BuilderEvent::Cancelled);
    assert!(b.conditions().is_empty());
    b.set_active(true);
    assert!(b.is_active());
    assert_eq!(b.stage(), Stage::FieldSelection);
}

#[test]
fn toggles_change_the_view() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    assert!(b.view().contains("Query: priority=1"));
    key(&mut b, Key::Ctrl('p'));
    assert!(!b.view().contains("Query:"));
    assert!(!b.view().contains("Validation:"));
    key(&mut b, Key::Ctrl('e'));
    assert!(b.view().contains("Validation:"));
}

#[test]
fn ctrl_r_reports_counts() {
    let mut b = builder();
    add_typed(&mut b, "short_description", Operator::Contains, "a^b");
    key(&mut b, Key::Ctrl('r'));
    assert_eq!(b.notice(), Some("validated: 0 errors, 1 warnings"));
}

#[test]
fn view_lists_committed_conditions() {
    let mut b = builder();
    add_typed(&mut b, "priority", Operator::Eq, "1");
    add_typed(&mut b, "active", Operator::Eq, "true");
    key(&mut b, Key::Char('o'));
    let view = b.view();
    assert!(view.contains("1. Priority is 1 OR"));
    assert!(view.contains("2. Active is true"));
    assert!(view.contains("Field"));
}

#[test]
fn set_conditions_replaces_state() {
    let mut b = builder();
    let set = ConditionSet::from_vec(vec![
        crate::condition::Condition::new(FieldDescriptor::text("category"), Operator::Eq, "network")
            .with_next(LogicalOp::Or),
        crate::condition::Condition::new(FieldDescriptor::text("category"), Operator::Eq, "hardware"),
    ]);
    b.set_conditions(set);
    assert_eq!(b.build_query(), "category=network^ORcategory=hardware");
    assert!(b.report().is_valid);
}

struct Broken;

impl MetadataProvider for Broken {
    fn field_metadata(&self, table: &str) -> Result<Vec<FieldDescriptor>> {
        Err(Error::TableNotFound(table.to_string()))
    }
}

#[test]
fn metadata_failure_allows_typed_fields() {
    let mut b = ConditionBuilder::from_metadata("u_custom", &Broken, BuilderConfig::default());
    assert!(b.fields().is_empty());
    assert!(b.notice().unwrap().contains("field metadata unavailable"));

    type_text(&mut b, "u_code");
    key(&mut b, Key::Enter);
    assert_eq!(b.stage(), Stage::OperatorSelection);
    assert_eq!(b.draft().field.as_ref().unwrap().field_type, FieldType::Text);
    key(&mut b, Key::Enter);
    type_text(&mut b, "x1");
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "u_code=x1");
}

struct Users;

impl RecordSource for Users {
    fn list(&self, _table: &str, _params: &ListParams) -> Result<Vec<Record>> {
        let record = json!({"sys_id": "u1", "name": "Fred Luddy"});
        Ok(vec![record.as_object().unwrap().clone()])
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn reference_search_results_are_drained() {
    let config = BuilderConfig {
        search_debounce_ms: 0,
        ..BuilderConfig::default()
    };
    let mut b = ConditionBuilder::new("incident", fields(), config)
        .with_record_source(Arc::new(Users), Handle::current());
    pick_field(&mut b, "assigned_to");
    pick_operator(&mut b, Operator::Eq);
    type_text(&mut b, "fr");

    let mut drained = false;
    for _ in 0..100 {
        if b.drain_search_results() {
            drained = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(drained);
    assert!(b.view().contains("Fred Luddy"));
    assert_eq!(key(&mut b, Key::Enter), BuilderEvent::Committed(1));
    assert_eq!(b.build_query(), "assigned_to=u1");
    assert_eq!(b.conditions().last().unwrap().summary(), "Assigned to is Fred Luddy");
}
