// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Field metadata for a remote table.
//!
//! A [`FieldDescriptor`] is loaded once per table from a
//! [`MetadataProvider`](crate::provider::MetadataProvider) and stays
//! read-only for the whole build session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value type of a field, which decides its legal operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Reference,
    Choice,
    LongText,
}

impl FieldType {
    /// Maps a backend internal type name onto a field type.
    ///
    /// Unknown names fall back to [`FieldType::Text`], which also selects the
    /// text operator set.
    pub fn from_internal(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "longint" | "order_index" => FieldType::Integer,
            "decimal" | "float" | "currency" | "price" | "percent_complete" => FieldType::Decimal,
            "boolean" | "bool" => FieldType::Boolean,
            "glide_date" | "date" => FieldType::Date,
            "glide_date_time" | "due_date" | "datetime" | "date_time" => FieldType::DateTime,
            "reference" => FieldType::Reference,
            "choice" => FieldType::Choice,
            "journal" | "journal_input" | "html" | "long_text" | "multi_line_text" => {
                FieldType::LongText
            }
            _ => FieldType::Text,
        }
    }

    /// Returns the canonical name used in metadata files.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Date => "glide_date",
            FieldType::DateTime => "glide_date_time",
            FieldType::Reference => "reference",
            FieldType::Choice => "choice",
            FieldType::LongText => "journal",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }

    pub fn is_date(self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    /// True for types whose values are free text typed by the user.
    pub fn is_free_text(self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::LongText | FieldType::Reference
        )
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from_internal(&name)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a choice field's enumerated value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Choice {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Metadata for a single column of a remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Backend column name, used verbatim in compiled queries.
    pub name: String,
    /// Human label. Empty means "use the name".
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub read_only: bool,
    /// Target table when `field_type` is reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_table: Option<String>,
    /// Enumerated values when `field_type` is choice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            label: String::new(),
            field_type,
            mandatory: false,
            read_only: false,
            reference_table: None,
            choices: Vec::new(),
            max_length: None,
        }
    }

    /// An ad-hoc text field, used when metadata is unavailable.
    pub fn text(name: impl Into<String>) -> Self {
        FieldDescriptor::new(name, FieldType::Text)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_reference(mut self, table: impl Into<String>) -> Self {
        self.reference_table = Some(table.into());
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// The label if set, otherwise the column name.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    /// Looks up the label of an enumerated choice value.
    pub fn choice_label(&self, value: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
    }

    pub fn has_choice(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
