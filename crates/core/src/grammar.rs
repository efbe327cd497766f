// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operator grammar keyed by field type.
//!
//! The table is declarative: each [`FieldType`] maps to an ordered slice of
//! [`Operator`]s, and each operator carries its backend token plus the
//! `requires_value` / `date_only` flags the builder branches on.
//!
//! ```text
//! text / long text   =  !=  CONTAINS  DOESNOTCONTAIN  STARTSWITH  ENDSWITH  LIKE  IN  NOT IN  ISEMPTY  ISNOTEMPTY
//! integer / decimal  =  !=  >  >=  <  <=  IN  NOT IN  ISEMPTY  ISNOTEMPTY
//! boolean            =  !=
//! date / date-time   =  !=  >  >=  <  <=  BETWEEN  TODAY … LASTYEAR  ISEMPTY  ISNOTEMPTY
//! reference          =  !=  CONTAINS  STARTSWITH  ISEMPTY  ISNOTEMPTY
//! choice             =  !=  IN  NOT IN  ISEMPTY  ISNOTEMPTY
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::FieldType;

/// An operator of the backend's encoded query grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    Like,
    Gt,
    Ge,
    Lt,
    Le,
    Between,
    In,
    NotIn,
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

impl Operator {
    /// Every operator, longest token first so prefix matching is unambiguous.
    pub const BY_TOKEN_LENGTH: [Operator; 24] = [
        Operator::DoesNotContain,
        Operator::StartsWith,
        Operator::IsNotEmpty,
        Operator::LastMonth,
        Operator::ThisMonth,
        Operator::Yesterday,
        Operator::Contains,
        Operator::EndsWith,
        Operator::LastWeek,
        Operator::LastYear,
        Operator::ThisWeek,
        Operator::ThisYear,
        Operator::Between,
        Operator::IsEmpty,
        Operator::NotIn,
        Operator::Today,
        Operator::Like,
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::In,
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
    ];

    /// The bit-exact backend token.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Contains => "CONTAINS",
            Operator::DoesNotContain => "DOESNOTCONTAIN",
            Operator::StartsWith => "STARTSWITH",
            Operator::EndsWith => "ENDSWITH",
            Operator::IsEmpty => "ISEMPTY",
            Operator::IsNotEmpty => "ISNOTEMPTY",
            Operator::Like => "LIKE",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Today => "TODAY",
            Operator::Yesterday => "YESTERDAY",
            Operator::ThisWeek => "THISWEEK",
            Operator::LastWeek => "LASTWEEK",
            Operator::ThisMonth => "THISMONTH",
            Operator::LastMonth => "LASTMONTH",
            Operator::ThisYear => "THISYEAR",
            Operator::LastYear => "LASTYEAR",
        }
    }

    /// Exact token lookup.
    pub fn from_token(token: &str) -> Option<Operator> {
        Operator::BY_TOKEN_LENGTH
            .iter()
            .copied()
            .find(|op| op.token() == token)
    }

    /// Matches the longest operator token at the start of `s`.
    pub fn match_prefix(s: &str) -> Option<(Operator, &str)> {
        Operator::BY_TOKEN_LENGTH
            .iter()
            .copied()
            .find(|op| s.starts_with(op.token()))
            .map(|op| (op, &s[op.token().len()..]))
    }

    pub fn label(self) -> &'static str {
        match self {
            Operator::Eq => "is",
            Operator::Ne => "is not",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does not contain",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
            Operator::Like => "is like",
            Operator::Gt => "greater than",
            Operator::Ge => "at least",
            Operator::Lt => "less than",
            Operator::Le => "at most",
            Operator::Between => "between",
            Operator::In => "is one of",
            Operator::NotIn => "is not one of",
            Operator::Today => "today",
            Operator::Yesterday => "yesterday",
            Operator::ThisWeek => "this week",
            Operator::LastWeek => "last week",
            Operator::ThisMonth => "this month",
            Operator::LastMonth => "last month",
            Operator::ThisYear => "this year",
            Operator::LastYear => "last year",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operator::Eq => "Value matches exactly",
            Operator::Ne => "Value differs",
            Operator::Contains => "Value contains the text anywhere",
            Operator::DoesNotContain => "Value does not contain the text",
            Operator::StartsWith => "Value begins with the text",
            Operator::EndsWith => "Value ends with the text",
            Operator::IsEmpty => "Field has no value",
            Operator::IsNotEmpty => "Field has any value",
            Operator::Like => "Value matches the pattern",
            Operator::Gt => "Strictly greater than the value",
            Operator::Ge => "Greater than or equal to the value",
            Operator::Lt => "Strictly less than the value",
            Operator::Le => "Less than or equal to the value",
            Operator::Between => "Falls inside a date range",
            Operator::In => "Matches any of a comma-separated list",
            Operator::NotIn => "Matches none of a comma-separated list",
            Operator::Today => "Falls on the current day",
            Operator::Yesterday => "Falls on the previous day",
            Operator::ThisWeek => "Falls in the current week",
            Operator::LastWeek => "Falls in the previous week",
            Operator::ThisMonth => "Falls in the current month",
            Operator::LastMonth => "Falls in the previous month",
            Operator::ThisYear => "Falls in the current year",
            Operator::LastYear => "Falls in the previous year",
        }
    }

    /// False for presence checks and date keywords, which compile with an
    /// empty value slot.
    pub fn requires_value(self) -> bool {
        !(self.is_presence() || self.is_date_keyword())
    }

    /// Operators only meaningful on date and date-time fields.
    pub fn is_date_only(self) -> bool {
        self == Operator::Between || self.is_date_keyword()
    }

    pub fn is_date_keyword(self) -> bool {
        matches!(
            self,
            Operator::Today
                | Operator::Yesterday
                | Operator::ThisWeek
                | Operator::LastWeek
                | Operator::ThisMonth
                | Operator::LastMonth
                | Operator::ThisYear
                | Operator::LastYear
        )
    }

    pub fn is_presence(self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// Substring and pattern operators.
    pub fn is_text_match(self) -> bool {
        matches!(
            self,
            Operator::Contains
                | Operator::DoesNotContain
                | Operator::StartsWith
                | Operator::EndsWith
                | Operator::Like
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }

    /// Operators whose value is a comma-separated list.
    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn descriptor(self) -> OperatorDescriptor {
        OperatorDescriptor {
            operator: self,
            label: self.label(),
            description: self.description(),
            requires_value: self.requires_value(),
            date_only: self.is_date_only(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Static description of one operator as offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub operator: Operator,
    pub label: &'static str,
    pub description: &'static str,
    pub requires_value: bool,
    pub date_only: bool,
}

impl OperatorDescriptor {
    pub fn token(&self) -> &'static str {
        self.operator.token()
    }
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Like,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Ge,
    Operator::Lt,
    Operator::Le,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ne];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Ge,
    Operator::Lt,
    Operator::Le,
    Operator::Between,
    Operator::Today,
    Operator::Yesterday,
    Operator::ThisWeek,
    Operator::LastWeek,
    Operator::ThisMonth,
    Operator::LastMonth,
    Operator::ThisYear,
    Operator::LastYear,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const REFERENCE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Contains,
    Operator::StartsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const CHOICE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

/// The legal operators for a field type, in presentation order.
pub fn operators_for(field_type: FieldType) -> &'static [Operator] {
    match field_type {
        FieldType::Integer | FieldType::Decimal => NUMERIC_OPERATORS,
        FieldType::Boolean => BOOLEAN_OPERATORS,
        FieldType::Date | FieldType::DateTime => DATE_OPERATORS,
        FieldType::Reference => REFERENCE_OPERATORS,
        FieldType::Choice => CHOICE_OPERATORS,
        FieldType::Text | FieldType::LongText => TEXT_OPERATORS,
    }
}

pub fn descriptors_for(field_type: FieldType) -> Vec<OperatorDescriptor> {
    operators_for(field_type)
        .iter()
        .map(|op| op.descriptor())
        .collect()
}

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod tests;
