// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Committed conditions and the ordered set they live in.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datetime::format_instant;
use crate::field::FieldDescriptor;
use crate::grammar::Operator;

/// How a condition joins the one that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    /// The combinator written between two conditions.
    pub fn separator(self) -> &'static str {
        match self {
            LogicalOp::And => "^",
            LogicalOp::Or => "^OR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One committed filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: FieldDescriptor,
    pub operator: Operator,
    /// Value exactly as compiled. Empty for value-less operators.
    pub value: String,
    /// Human label shown instead of `value`; never compiled.
    pub display_value: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// Combinator to the following condition. `None` on the last one.
    pub next: Option<LogicalOp>,
}

impl Condition {
    pub fn new(field: FieldDescriptor, operator: Operator, value: impl Into<String>) -> Self {
        Condition {
            field,
            operator,
            value: value.into(),
            display_value: None,
            start: None,
            end: None,
            next: None,
        }
    }

    /// A `BETWEEN` condition over an inclusive instant range.
    pub fn range(field: FieldDescriptor, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Condition {
            start: Some(start),
            end: Some(end),
            ..Condition::new(field, Operator::Between, "")
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display_value = Some(display.into());
        self
    }

    pub fn with_next(mut self, next: LogicalOp) -> Self {
        self.next = Some(next);
        self
    }

    /// One-line human summary, e.g. `Priority is one of 1,2`.
    pub fn summary(&self) -> String {
        let field = self.field.display_label();
        let op = self.operator.label();
        if !self.operator.requires_value() {
            return format!("{field} {op}");
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            return format!(
                "{field} {op} {} and {}",
                format_instant(start),
                format_instant(end)
            );
        }
        let value = self.display_value.as_deref().unwrap_or(&self.value);
        format!("{field} {op} {value}")
    }
}

/// Ordered conditions, where only the last one has no `next`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    pub fn new() -> Self {
        ConditionSet(Vec::new())
    }

    /// Builds a set, clearing any `next` left on the final condition.
    pub fn from_vec(mut conditions: Vec<Condition>) -> Self {
        if let Some(last) = conditions.last_mut() {
            last.next = None;
        }
        ConditionSet(conditions)
    }

    /// Appends `condition`, joining it to the previous one with `joined_by`.
    ///
    /// `joined_by` is ignored for the first condition.
    pub fn push(&mut self, mut condition: Condition, joined_by: LogicalOp) {
        if let Some(prev) = self.0.last_mut() {
            prev.next = Some(joined_by);
        }
        condition.next = None;
        self.0.push(condition);
    }

    /// Removes the last condition and clears the new last one's `next`.
    pub fn pop(&mut self) -> Option<Condition> {
        let popped = self.0.pop();
        if let Some(last) = self.0.last_mut() {
            last.next = None;
        }
        popped
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.0
    }

    pub fn last(&self) -> Option<&Condition> {
        self.0.last()
    }
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(conditions: Vec<Condition>) -> Self {
        ConditionSet::from_vec(conditions)
    }
}

impl From<ConditionSet> for Vec<Condition> {
    fn from(set: ConditionSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The scratch condition under construction.
#[derive(Debug, Clone, Default)]
pub struct ConditionDraft {
    pub field: Option<FieldDescriptor>,
    pub operator: Option<Operator>,
    pub value: String,
    pub display_value: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl ConditionDraft {
    /// Clears everything chosen after the operator.
    pub fn clear_value(&mut self) {
        self.value.clear();
        self.display_value = None;
        self.start = None;
        self.end = None;
    }

    /// The committed form, once field and operator are chosen.
    pub fn to_condition(&self) -> Option<Condition> {
        let field = self.field.clone()?;
        let operator = self.operator?;
        Some(Condition {
            field,
            operator,
            value: self.value.clone(),
            display_value: self.display_value.clone(),
            start: self.start,
            end: self.end,
            next: None,
        })
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
