// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! nowq-core: structured filter construction for encoded table queries
//!
//! This crate provides the operator grammar, the condition model, the query
//! compiler and decompiler, validation, and the interactive condition
//! builder with its date and reference pickers. It never talks to a backend
//! itself; drivers supply metadata and records through [`provider`] traits.

pub mod builder;
pub mod calendar;
pub mod compile;
pub mod condition;
pub mod config;
pub mod datetime;
pub mod error;
pub mod field;
pub mod grammar;
pub mod key;
pub mod parse;
pub mod provider;
pub mod range;
pub mod reference;
pub mod validate;
pub mod widget;

pub use builder::{BuilderEvent, ConditionBuilder, Message, Stage};
pub use calendar::Calendar;
pub use compile::{compile, compile_condition};
pub use condition::{Condition, ConditionDraft, ConditionSet, LogicalOp};
pub use config::BuilderConfig;
pub use error::{Error, Result};
pub use field::{Choice, FieldDescriptor, FieldType};
pub use grammar::{Operator, OperatorDescriptor};
pub use key::Key;
pub use parse::parse_encoded;
pub use provider::{
    Clock, FilterStore, FixedClock, ListParams, MemoryFilterStore, MetadataProvider, Record,
    RecordSource, SavedFilter, SystemClock,
};
pub use range::{DateRangePicker, Preset};
pub use reference::{ReferenceCandidate, ReferenceResolver, SearchResponse};
pub use validate::{
    validate_query, validate_raw_query, IssueKind, Severity, ValidationIssue, ValidationReport,
};
pub use widget::Transition;
