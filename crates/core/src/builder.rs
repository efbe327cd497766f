// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The condition builder state machine.
//!
//! ```text
//! FieldSelection → OperatorSelection → value stage → LogicalOperator → FieldSelection
//!                                       │
//!                                       ├─ ValueInput       (typed text)
//!                                       ├─ ChoiceSelection  (choice fields)
//!                                       ├─ ReferenceSearch  (reference fields)
//!                                       ├─ Calendar         (single date)
//!                                       ├─ DateRange        (BETWEEN, picker)
//!                                       └─ DualDateInput    (BETWEEN, typed)
//! ```
//!
//! Value-less operators skip the value stage. The first condition is
//! committed without asking for a logical operator. The builder owns its
//! child pickers and watches their [`Transition`]s to detect completion.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::calendar::Calendar;
use crate::compile::compile;
use crate::condition::{ConditionDraft, ConditionSet, LogicalOp};
use crate::config::BuilderConfig;
use crate::datetime::{format_date, format_instant, parse_range_bound};
use crate::field::{FieldDescriptor, FieldType};
use crate::grammar::{descriptors_for, Operator};
use crate::key::Key;
use crate::provider::{Clock, MetadataProvider, RecordSource, SystemClock};
use crate::range::{check_order, DateRangePicker};
use crate::reference::{ReferenceResolver, SearchDispatcher, SearchResponse};
use crate::validate::{validate_draft, validate_query, Severity, ValidationReport};
use crate::widget::{Picker, TextInput, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FieldSelection,
    OperatorSelection,
    ValueInput,
    ChoiceSelection,
    ReferenceSearch,
    Calendar,
    DateRange,
    DualDateInput,
    LogicalOperator,
}

/// Input to [`ConditionBuilder::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key(Key),
    Search(SearchResponse),
}

/// What the driver should do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderEvent {
    Continue,
    /// A condition was committed; carries the new condition count.
    Committed(usize),
    /// The user finished; carries the compiled query.
    Finished(String),
    /// The user left the builder; all state was discarded.
    Cancelled,
}

/// Two typed date bounds for `BETWEEN` without the picker.
#[derive(Debug, Clone, Default)]
struct DualDateInput {
    start: TextInput,
    end: TextInput,
    editing_end: bool,
}

impl DualDateInput {
    fn new() -> Self {
        DualDateInput {
            start: TextInput::with_placeholder("YYYY-MM-DD [HH:MM:SS]"),
            end: TextInput::with_placeholder("YYYY-MM-DD [HH:MM:SS]"),
            editing_end: false,
        }
    }

    fn focused(&mut self) -> &mut TextInput {
        if self.editing_end {
            &mut self.end
        } else {
            &mut self.start
        }
    }

    fn view(&self) -> String {
        let marker = |focused: bool| if focused { "●" } else { "○" };
        format!(
            "Date range\n  {} From: {}\n  {} To:   {}\nTab: switch field  Enter: confirm  Esc: back\n",
            marker(!self.editing_end),
            self.start.render(),
            marker(self.editing_end),
            self.end.render()
        )
    }
}

pub struct ConditionBuilder {
    table: String,
    fields: Vec<FieldDescriptor>,
    config: BuilderConfig,
    clock: Box<dyn Clock>,
    conditions: ConditionSet,
    draft: ConditionDraft,
    stage: Stage,
    value_origin: Stage,
    field_picker: Picker<usize>,
    operator_picker: Picker<Operator>,
    choice_picker: Picker<String>,
    logical_picker: Picker<LogicalOp>,
    value_input: TextInput,
    dual: DualDateInput,
    calendar: Calendar,
    range: DateRangePicker,
    reference: ReferenceResolver,
    dispatcher: Option<SearchDispatcher>,
    search_rx: Option<UnboundedReceiver<SearchResponse>>,
    notice: Option<String>,
    report: ValidationReport,
    advanced_dates: bool,
    show_preview: bool,
    show_validation: bool,
    active: bool,
}

fn field_items(fields: &[FieldDescriptor]) -> Vec<(String, usize)> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let label = if f.label.trim().is_empty() || f.label == f.name {
                format!("{}  · {}", f.name, f.field_type)
            } else {
                format!("{} ({})  · {}", f.label, f.name, f.field_type)
            };
            (label, i)
        })
        .collect()
}

fn placeholder(field: &FieldDescriptor, op: Operator) -> &'static str {
    if op.is_list() {
        return "comma-separated, e.g. 1,2,3";
    }
    match field.field_type {
        FieldType::Integer => "e.g. 42",
        FieldType::Decimal => "e.g. 3.5",
        FieldType::Boolean => "true or false",
        FieldType::Date => "YYYY-MM-DD",
        FieldType::DateTime => "YYYY-MM-DD HH:MM:SS",
        _ if op == Operator::Like => "pattern",
        _ => "text",
    }
}

impl ConditionBuilder {
    pub fn new(table: impl Into<String>, fields: Vec<FieldDescriptor>, config: BuilderConfig) -> Self {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        let now = clock.now();
        let table = table.into();
        ConditionBuilder {
            field_picker: Picker::filterable(field_items(&fields)),
            operator_picker: Picker::new(Vec::new()),
            choice_picker: Picker::new(Vec::new()),
            logical_picker: Picker::new(vec![
                ("AND".to_string(), LogicalOp::And),
                ("OR".to_string(), LogicalOp::Or),
            ]),
            value_input: TextInput::new(),
            dual: DualDateInput::new(),
            calendar: Calendar::new(now),
            range: DateRangePicker::new(now),
            reference: ReferenceResolver::new(table.clone(), config.reference_min_chars, None),
            dispatcher: None,
            search_rx: None,
            notice: None,
            report: ValidationReport::default(),
            advanced_dates: config.advanced_date_picker,
            show_preview: config.show_preview,
            show_validation: config.show_validation,
            active: true,
            conditions: ConditionSet::new(),
            draft: ConditionDraft::default(),
            stage: Stage::FieldSelection,
            value_origin: Stage::ValueInput,
            table,
            fields,
            config,
            clock,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Enables reference search against `source`, run on `runtime`.
    pub fn with_record_source(mut self, source: Arc<dyn RecordSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        self.dispatcher = Some(SearchDispatcher::new(source, runtime, tx, &self.config));
        self.search_rx = Some(rx);
        self
    }

    /// Loads fields through `provider`.
    ///
    /// A metadata failure leaves the field list empty; field names can
    /// still be typed and are treated as text fields.
    pub fn from_metadata(
        table: &str,
        provider: &dyn MetadataProvider,
        config: BuilderConfig,
    ) -> Self {
        match provider.field_metadata(table) {
            Ok(fields) => ConditionBuilder::new(table, fields, config),
            Err(e) => {
                tracing::warn!(table, error = %e, "field metadata unavailable, using text fields");
                let mut builder = ConditionBuilder::new(table, Vec::new(), config);
                builder.notice = Some(format!(
                    "field metadata unavailable ({e}); type a field name and press Enter"
                ));
                builder
            }
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn draft(&self) -> &ConditionDraft {
        &self.draft
    }

    pub fn advanced_dates(&self) -> bool {
        self.advanced_dates
    }

    /// The compiled form of the committed conditions.
    pub fn build_query(&self) -> String {
        compile(self.conditions.as_slice())
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    /// Replaces the committed conditions, e.g. with a loaded saved filter.
    pub fn set_conditions(&mut self, conditions: ConditionSet) {
        self.conditions = conditions;
        self.draft = ConditionDraft::default();
        self.set_stage(Stage::FieldSelection);
        self.revalidate();
    }

    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.draft = ConditionDraft::default();
            self.field_picker.clear_filter();
            self.set_stage(Stage::FieldSelection);
        }
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Applies finished reference searches. Returns true if any was current.
    pub fn drain_search_results(&mut self) -> bool {
        let mut changed = false;
        let mut responses = Vec::new();
        if let Some(rx) = &mut self.search_rx {
            while let Ok(response) = rx.try_recv() {
                responses.push(response);
            }
        }
        for response in responses {
            changed |= self.reference.receive(response);
        }
        changed
    }

    fn set_stage(&mut self, stage: Stage) {
        if self.stage != stage {
            tracing::debug!(from = ?self.stage, to = ?stage, "builder stage");
        }
        self.stage = stage;
    }

    fn revalidate(&mut self) {
        self.report = validate_query(self.conditions.as_slice());
    }

    pub fn update(&mut self, message: Message) -> BuilderEvent {
        let key = match message {
            Message::Search(response) => {
                self.reference.receive(response);
                return BuilderEvent::Continue;
            }
            Message::Key(key) => key,
        };
        if !self.active {
            return BuilderEvent::Continue;
        }
        self.notice = None;

        if let Key::Ctrl(c) = key {
            if let Some(event) = self.global_command(c) {
                return event;
            }
        }

        match self.stage {
            Stage::FieldSelection => self.update_field_selection(key),
            Stage::OperatorSelection => self.update_operator_selection(key),
            Stage::ValueInput => self.update_value_input(key),
            Stage::ChoiceSelection => self.update_choice_selection(key),
            Stage::ReferenceSearch => self.update_reference(key),
            Stage::Calendar => self.update_calendar(key),
            Stage::DateRange => self.update_range(key),
            Stage::DualDateInput => self.update_dual(key),
            Stage::LogicalOperator => self.update_logical(key),
        }
    }

    fn global_command(&mut self, c: char) -> Option<BuilderEvent> {
        match c {
            'c' => Some(self.cancel_session()),
            'p' => {
                self.show_preview = !self.show_preview;
                Some(BuilderEvent::Continue)
            }
            'e' => {
                self.show_validation = !self.show_validation;
                Some(BuilderEvent::Continue)
            }
            'r' => {
                self.revalidate();
                let errors = self.report.errors().count();
                let warnings = self.report.warnings().count();
                self.notice = Some(format!("validated: {errors} errors, {warnings} warnings"));
                Some(BuilderEvent::Continue)
            }
            'u' => {
                match self.conditions.pop() {
                    Some(removed) => {
                        tracing::debug!(remaining = self.conditions.len(), "condition removed");
                        self.notice = Some(format!("removed: {}", removed.summary()));
                    }
                    None => self.notice = Some("nothing to remove".to_string()),
                }
                self.revalidate();
                Some(BuilderEvent::Continue)
            }
            'l' => {
                self.conditions.clear();
                self.draft = ConditionDraft::default();
                self.field_picker.clear_filter();
                self.set_stage(Stage::FieldSelection);
                self.report = ValidationReport::default();
                self.notice = Some("filter reset".to_string());
                Some(BuilderEvent::Continue)
            }
            't' => {
                self.advanced_dates = !self.advanced_dates;
                let mode = if self.advanced_dates { "picker" } else { "typed" };
                self.notice = Some(format!("date entry: {mode}"));
                let on_date_stage = match self.stage {
                    Stage::Calendar | Stage::DateRange | Stage::DualDateInput => true,
                    Stage::ValueInput => self
                        .draft
                        .field
                        .as_ref()
                        .is_some_and(|f| f.field_type.is_date()),
                    _ => false,
                };
                if on_date_stage {
                    self.draft.clear_value();
                    return Some(self.enter_value_stage());
                }
                Some(BuilderEvent::Continue)
            }
            's' => {
                if self.conditions.is_empty() {
                    self.notice = Some("add at least one condition before finishing".to_string());
                    return Some(BuilderEvent::Continue);
                }
                Some(self.finish())
            }
            _ => None,
        }
    }

    fn cancel_session(&mut self) -> BuilderEvent {
        tracing::info!(table = %self.table, "builder cancelled");
        self.conditions.clear();
        self.draft = ConditionDraft::default();
        self.report = ValidationReport::default();
        self.field_picker.clear_filter();
        self.set_stage(Stage::FieldSelection);
        self.active = false;
        BuilderEvent::Cancelled
    }

    fn finish(&mut self) -> BuilderEvent {
        let query = self.build_query();
        tracing::info!(table = %self.table, conditions = self.conditions.len(), "builder finished");
        self.active = false;
        BuilderEvent::Finished(query)
    }

    fn update_field_selection(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Esc => self.cancel_session(),
            Key::Enter => {
                let field = match self.field_picker.selected() {
                    Some(&i) => self.fields.get(i).cloned(),
                    None => {
                        let typed = self.field_picker.filter_text().trim();
                        (!typed.is_empty()).then(|| FieldDescriptor::text(typed))
                    }
                };
                if let Some(field) = field {
                    self.choose_field(field);
                }
                BuilderEvent::Continue
            }
            other => {
                self.field_picker.handle(other);
                BuilderEvent::Continue
            }
        }
    }

    fn choose_field(&mut self, field: FieldDescriptor) {
        tracing::debug!(field = %field.name, field_type = %field.field_type, "field chosen");
        let items = descriptors_for(field.field_type)
            .into_iter()
            .map(|d| (format!("{:<16} {}", d.label, d.token()), d.operator))
            .collect();
        self.operator_picker.set_items(items);
        self.draft = ConditionDraft {
            field: Some(field),
            ..ConditionDraft::default()
        };
        self.set_stage(Stage::OperatorSelection);
    }

    fn update_operator_selection(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Esc => {
                self.draft = ConditionDraft::default();
                self.set_stage(Stage::FieldSelection);
                BuilderEvent::Continue
            }
            Key::Enter => {
                let Some(op) = self.operator_picker.selected().copied() else {
                    return BuilderEvent::Continue;
                };
                self.draft.operator = Some(op);
                self.draft.clear_value();
                self.enter_value_stage()
            }
            other => {
                self.operator_picker.handle(other);
                BuilderEvent::Continue
            }
        }
    }

    /// Routes to the value stage the chosen field and operator need.
    fn enter_value_stage(&mut self) -> BuilderEvent {
        let (Some(field), Some(op)) = (self.draft.field.clone(), self.draft.operator) else {
            self.set_stage(Stage::FieldSelection);
            return BuilderEvent::Continue;
        };
        let now = self.clock.now();

        if !op.requires_value() {
            return self.value_complete(Stage::OperatorSelection);
        }

        if op.is_date_only() {
            if self.advanced_dates {
                self.range = DateRangePicker::new(now)
                    .with_time(self.config.show_time && field.field_type == FieldType::DateTime)
                    .allow_same_day(self.config.allow_same_day_range);
                self.range.activate(now);
                self.set_stage(Stage::DateRange);
            } else {
                self.dual = DualDateInput::new();
                self.set_stage(Stage::DualDateInput);
            }
        } else if field.field_type == FieldType::Choice && !field.choices.is_empty() {
            let items = field
                .choices
                .iter()
                .map(|c| (format!("{} ({})", c.label, c.value), c.value.clone()))
                .collect();
            self.choice_picker = if op.is_list() {
                Picker::new(items).multi_select()
            } else {
                Picker::new(items)
            };
            self.set_stage(Stage::ChoiceSelection);
        } else if let (FieldType::Reference, Some(target)) =
            (field.field_type, field.reference_table.as_deref())
        {
            self.reference = ReferenceResolver::new(
                target,
                self.config.reference_min_chars,
                self.dispatcher.clone(),
            );
            self.reference.activate();
            self.set_stage(Stage::ReferenceSearch);
        } else if field.field_type.is_date() && self.advanced_dates {
            let with_time = self.config.show_time && field.field_type == FieldType::DateTime;
            self.calendar = Calendar::new(now)
                .with_time(with_time)
                .with_title(format!("{} {}", field.display_label(), op.label()));
            self.calendar.activate(now);
            self.set_stage(Stage::Calendar);
        } else {
            self.value_input = TextInput::with_placeholder(placeholder(&field, op));
            self.set_stage(Stage::ValueInput);
        }
        BuilderEvent::Continue
    }

    /// Validates the draft and moves on, or re-enters `from` on error.
    fn value_complete(&mut self, from: Stage) -> BuilderEvent {
        let issues = validate_draft(&self.draft);
        if let Some(error) = issues.iter().find(|i| i.severity == Severity::Error) {
            let mut message = error.message.clone();
            if let Some(suggestion) = &error.suggestion {
                message.push_str(&format!(" ({suggestion})"));
            }
            tracing::debug!(%message, "draft rejected");
            self.notice = Some(message);
            self.reenter(from);
            return BuilderEvent::Continue;
        }
        if let Some(warning) = issues.iter().find(|i| i.severity == Severity::Warning) {
            self.notice = Some(format!("warning: {}", warning.message));
        }

        self.value_origin = from;
        if self.conditions.is_empty() {
            return self.commit(LogicalOp::And);
        }
        self.set_stage(Stage::LogicalOperator);
        BuilderEvent::Continue
    }

    fn reenter(&mut self, stage: Stage) {
        let now = self.clock.now();
        match stage {
            Stage::Calendar => self.calendar.activate(now),
            Stage::DateRange => self.range.activate(now),
            Stage::ReferenceSearch => self.reference.resume(),
            _ => {}
        }
        self.set_stage(stage);
    }

    fn commit(&mut self, joined_by: LogicalOp) -> BuilderEvent {
        let Some(condition) = self.draft.to_condition() else {
            self.set_stage(Stage::FieldSelection);
            return BuilderEvent::Continue;
        };
        let summary = condition.summary();
        self.conditions.push(condition, joined_by);
        tracing::info!(
            table = %self.table,
            conditions = self.conditions.len(),
            joined_by = %joined_by,
            "condition committed"
        );
        self.draft = ConditionDraft::default();
        self.field_picker.clear_filter();
        self.revalidate();
        if self.notice.is_none() {
            self.notice = Some(format!("added: {summary}"));
        }
        self.set_stage(Stage::FieldSelection);
        BuilderEvent::Committed(self.conditions.len())
    }

    fn back_to_operator(&mut self) -> BuilderEvent {
        self.draft.clear_value();
        self.set_stage(Stage::OperatorSelection);
        BuilderEvent::Continue
    }

    fn update_value_input(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Esc => self.back_to_operator(),
            Key::Enter => {
                self.draft.value = self.value_input.text().trim().to_string();
                self.draft.display_value = None;
                self.value_complete(Stage::ValueInput)
            }
            other => {
                self.value_input.handle(other);
                BuilderEvent::Continue
            }
        }
    }

    fn update_choice_selection(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Esc => self.back_to_operator(),
            Key::Enter => {
                let mut values = self.choice_picker.marked();
                if values.is_empty() {
                    values.extend(self.choice_picker.selected().cloned());
                }
                if values.is_empty() {
                    return BuilderEvent::Continue;
                }
                let labels: Vec<String> = match &self.draft.field {
                    Some(field) => values
                        .iter()
                        .map(|v| field.choice_label(v).unwrap_or(v.as_str()).to_string())
                        .collect(),
                    None => values.clone(),
                };
                self.draft.value = values.join(",");
                self.draft.display_value = Some(labels.join(", "));
                self.value_complete(Stage::ChoiceSelection)
            }
            other => {
                self.choice_picker.handle(other);
                BuilderEvent::Continue
            }
        }
    }

    fn update_reference(&mut self, key: Key) -> BuilderEvent {
        match self.reference.update(key) {
            Transition::Continue => BuilderEvent::Continue,
            Transition::Cancelled => self.back_to_operator(),
            Transition::Done => {
                let Some((value, display)) = self.reference.take_choice() else {
                    return self.back_to_operator();
                };
                self.draft.value = value;
                self.draft.display_value = display;
                self.value_complete(Stage::ReferenceSearch)
            }
        }
    }

    fn update_calendar(&mut self, key: Key) -> BuilderEvent {
        match self.calendar.update(key) {
            Transition::Continue => BuilderEvent::Continue,
            Transition::Cancelled => self.back_to_operator(),
            Transition::Done => {
                let Some(instant) = self.calendar.selected_instant() else {
                    return self.back_to_operator();
                };
                let date_only = self
                    .draft
                    .field
                    .as_ref()
                    .is_some_and(|f| f.field_type == FieldType::Date);
                self.draft.value = if date_only {
                    format_date(instant.date())
                } else {
                    format_instant(instant)
                };
                self.value_complete(Stage::Calendar)
            }
        }
    }

    fn update_range(&mut self, key: Key) -> BuilderEvent {
        match self.range.update(key) {
            Transition::Continue => BuilderEvent::Continue,
            Transition::Cancelled => self.back_to_operator(),
            Transition::Done => {
                let Some((start, end)) = self.range.range() else {
                    return self.back_to_operator();
                };
                self.draft.start = Some(start);
                self.draft.end = Some(end);
                self.value_complete(Stage::DateRange)
            }
        }
    }

    fn update_dual(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Esc => self.back_to_operator(),
            Key::Tab | Key::BackTab | Key::Up | Key::Down => {
                self.dual.editing_end = !self.dual.editing_end;
                BuilderEvent::Continue
            }
            Key::Enter => {
                if !self.dual.editing_end && self.dual.end.is_empty() {
                    self.dual.editing_end = true;
                    return BuilderEvent::Continue;
                }
                let parsed = parse_range_bound(self.dual.start.text(), false)
                    .and_then(|s| parse_range_bound(self.dual.end.text(), true).map(|e| (s, e)));
                let (start, end) = match parsed {
                    Ok(bounds) => bounds,
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        return BuilderEvent::Continue;
                    }
                };
                if let Err(message) = check_order(start, end, self.config.allow_same_day_range) {
                    self.notice = Some(message);
                    self.dual.editing_end = true;
                    return BuilderEvent::Continue;
                }
                self.draft.start = Some(start);
                self.draft.end = Some(end);
                self.value_complete(Stage::DualDateInput)
            }
            other => {
                self.dual.focused().handle(other);
                BuilderEvent::Continue
            }
        }
    }

    fn update_logical(&mut self, key: Key) -> BuilderEvent {
        match key {
            Key::Char('a') | Key::Char('A') => self.commit(LogicalOp::And),
            Key::Char('o') | Key::Char('O') => self.commit(LogicalOp::Or),
            Key::Enter => {
                let op = self.logical_picker.selected().copied().unwrap_or_default();
                self.commit(op)
            }
            Key::Esc => {
                let origin = self.value_origin;
                if origin == Stage::OperatorSelection {
                    return self.back_to_operator();
                }
                self.reenter(origin);
                BuilderEvent::Continue
            }
            other => {
                self.logical_picker.handle(other);
                BuilderEvent::Continue
            }
        }
    }

    pub fn view(&self) -> String {
        let mut out = format!("Filter builder: {}\n\nConditions:\n", self.table);
        if self.conditions.is_empty() {
            out.push_str("  (none yet)\n");
        }
        for (i, c) in self.conditions.iter().enumerate() {
            let join = c.next.map(|n| format!(" {n}")).unwrap_or_default();
            out.push_str(&format!("  {}. {}{join}\n", i + 1, c.summary()));
        }
        if let Some(field) = &self.draft.field {
            let op = self.draft.operator.map(|o| o.label()).unwrap_or("…");
            out.push_str(&format!("\nNew: {} {op}\n", field.display_label()));
        }
        out.push('\n');

        out.push_str(&match self.stage {
            Stage::FieldSelection => {
                let mut s = self.field_picker.render("Field");
                if self.field_picker.is_empty() && !self.field_picker.filter_text().is_empty() {
                    s.push_str("  Enter: use as a text field\n");
                }
                s
            }
            Stage::OperatorSelection => self.operator_picker.render("Operator"),
            Stage::ValueInput => format!("Value\n  > {}\n", self.value_input.render()),
            Stage::ChoiceSelection => {
                let mut s = self.choice_picker.render("Value");
                if self.choice_picker.is_multi() {
                    s.push_str("  Space: mark  Enter: use marked\n");
                }
                s
            }
            Stage::ReferenceSearch => self.reference.view(),
            Stage::Calendar => self.calendar.view(),
            Stage::DateRange => self.range.view(),
            Stage::DualDateInput => self.dual.view(),
            Stage::LogicalOperator => {
                let mut s = self.logical_picker.render("Join with the previous condition");
                s.push_str("  a: AND  o: OR\n");
                s
            }
        });

        if self.show_preview {
            out.push_str(&format!("\nQuery: {}\n", self.build_query()));
        }
        if self.show_validation {
            out.push_str("\nValidation:\n");
            if self.report.issues.is_empty() {
                out.push_str("  no issues\n");
            }
            for issue in &self.report.issues {
                out.push_str(&format!("  {issue}\n"));
            }
        }
        if let Some(notice) = &self.notice {
            out.push_str(&format!("\n! {notice}\n"));
        }
        out.push_str(
            "\nCtrl-S: finish  Ctrl-U: undo  Ctrl-L: reset  Ctrl-P: preview  Ctrl-E: validation  Ctrl-T: date entry  Esc: back\n",
        );
        out
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
