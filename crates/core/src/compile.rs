// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Serializes conditions into the backend's encoded query string.
//!
//! Each condition is `<field><TOKEN><value>`; conditions are joined by the
//! separator of the `next` stored on the left-hand condition.

use crate::condition::{Condition, LogicalOp};
use crate::datetime::range_expression;

/// Compiles one condition without any combinator.
pub fn compile_condition(condition: &Condition) -> String {
    let field = &condition.field.name;
    let token = condition.operator.token();
    if !condition.operator.requires_value() {
        return format!("{field}{token}");
    }
    match (condition.start, condition.end) {
        (Some(start), Some(end)) => format!("{field}{token}{}", range_expression(start, end)),
        _ => format!("{field}{token}{}", condition.value),
    }
}

/// Compiles an ordered list of conditions. An empty list yields `""`.
pub fn compile(conditions: &[Condition]) -> String {
    let mut out = String::new();
    let mut pending: Option<LogicalOp> = None;
    for condition in conditions {
        if !out.is_empty() {
            out.push_str(pending.unwrap_or_default().separator());
        }
        out.push_str(&compile_condition(condition));
        pending = condition.next;
    }
    out
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
