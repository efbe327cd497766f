// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Splits a flat encoded query back into conditions.
//!
//! Only the strict left-to-right chain the compiler emits is understood:
//! `<field><TOKEN><value>` terms joined by `^` or `^OR`. Sort terms
//! (`ORDERBY…`) are dropped.

use crate::condition::{Condition, ConditionSet, LogicalOp};
use crate::datetime::{is_range_expression, parse_range_expression};
use crate::error::{Error, Result};
use crate::field::FieldDescriptor;
use crate::grammar::Operator;

/// Parses `query` into a condition set, resolving field names against
/// `fields`. Unknown names become ad-hoc text fields.
pub fn parse_encoded(query: &str, fields: &[FieldDescriptor]) -> Result<ConditionSet> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let mut by_length: Vec<&FieldDescriptor> = fields.iter().collect();
    by_length.sort_by_key(|f| std::cmp::Reverse(f.name.len()));

    let mut set = ConditionSet::new();
    for (join, term) in split_terms(query) {
        if term.is_empty() {
            return Err(Error::Syntax(format!(
                "empty condition in '{query}' (doubled or dangling combinator)"
            )));
        }
        if term.starts_with("ORDERBY") {
            continue;
        }
        let condition = parse_term(term, &by_length)?;
        set.push(condition, join);
    }

    if set.is_empty() {
        return Err(Error::EmptyQuery);
    }
    tracing::debug!(conditions = set.len(), "parsed encoded query");
    Ok(set)
}

/// Splits on combinators, pairing each term with the join that precedes it.
fn split_terms(query: &str) -> Vec<(LogicalOp, &str)> {
    let mut terms = Vec::new();
    let mut join = LogicalOp::And;
    let mut start = 0;
    let mut rest = query;
    while let Some(pos) = rest.find('^') {
        let absolute = start + pos;
        terms.push((join, &query[start..absolute]));
        let after = &query[absolute + 1..];
        if after.starts_with("OR") && !after.starts_with("ORDERBY") {
            join = LogicalOp::Or;
            start = absolute + 3;
        } else {
            join = LogicalOp::And;
            start = absolute + 1;
        }
        rest = &query[start..];
    }
    terms.push((join, &query[start..]));
    terms
}

fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn parse_term(term: &str, fields: &[&FieldDescriptor]) -> Result<Condition> {
    let (field, op, value) = split_term(term, fields).ok_or_else(|| {
        Error::Syntax(format!("no operator found in '{term}'"))
    })?;

    if !op.requires_value() {
        if !value.is_empty() {
            return Err(Error::Syntax(format!(
                "operator {} takes no value in '{term}'",
                op.token()
            )));
        }
        return Ok(Condition::new(field, op, ""));
    }

    if op == Operator::Between && is_range_expression(value) {
        let (start, end) = parse_range_expression(value)?;
        return Ok(Condition::range(field, start, end));
    }
    Ok(Condition::new(field, op, value))
}

fn split_term<'a>(
    term: &'a str,
    fields: &[&FieldDescriptor],
) -> Option<(FieldDescriptor, Operator, &'a str)> {
    for field in fields {
        if let Some(rest) = term.strip_prefix(field.name.as_str()) {
            if let Some((op, value)) = Operator::match_prefix(rest) {
                return Some(((*field).clone(), op, value));
            }
        }
    }

    for (idx, c) in term.char_indices() {
        if idx > 0 {
            if let Some((op, value)) = Operator::match_prefix(&term[idx..]) {
                return Some((FieldDescriptor::text(&term[..idx]), op, value));
            }
        }
        if !is_field_char(c) {
            break;
        }
    }
    None
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
