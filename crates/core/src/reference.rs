// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Search-as-you-type lookup of reference field values.
//!
//! Searches run off the event loop: [`SearchDispatcher::dispatch`] spawns a
//! task on a tokio runtime that waits out the debounce interval, runs the
//! blocking [`RecordSource::list`] call under a timeout, and sends a
//! [`SearchResponse`] back over an unbounded channel. The driver drains the
//! channel and hands each response to [`ReferenceResolver::receive`].
//!
//! Every input change takes a sequence number from the dispatcher, so
//! numbers keep increasing across all resolvers that share it. A response
//! whose sequence number is not the latest, or whose text no longer matches
//! the input, is discarded. A debounced task that wakes up superseded never
//! calls the source at all.

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::BuilderConfig;
use crate::error::Error;
use crate::key::Key;
use crate::provider::{ListParams, Record, RecordSource};
use crate::widget::{Picker, TextInput, Transition};

/// Record columns tried, in order, for a candidate's label.
pub const DISPLAY_FIELDS: [&str; 7] = [
    "name",
    "title",
    "display_name",
    "short_description",
    "number",
    "user_name",
    "email",
];

/// Column holding a record's identifier.
pub const IDENTIFIER_FIELD: &str = "sys_id";

/// A record that can be picked as a reference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCandidate {
    pub identifier: String,
    pub display_label: String,
    pub source_table: String,
}

/// `nameLIKEtext^ORtitleLIKEtext^OR…` over [`DISPLAY_FIELDS`].
pub fn search_query(text: &str) -> String {
    DISPLAY_FIELDS
        .iter()
        .map(|field| format!("{field}LIKE{text}"))
        .collect::<Vec<_>>()
        .join("^OR")
}

pub fn list_params(text: &str, limit: usize) -> ListParams {
    let mut fields = vec![IDENTIFIER_FIELD.to_string()];
    fields.extend(DISPLAY_FIELDS.iter().map(|f| f.to_string()));
    ListParams {
        query: search_query(text),
        fields,
        limit,
    }
}

/// Text of a record value. Reference columns may come back as
/// `{"value": …, "display_value": …}` objects.
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => {
            return map
                .get("display_value")
                .and_then(value_text)
                .or_else(|| map.get("value").and_then(value_text));
        }
        Value::Null | Value::Array(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Reduces a record to a candidate.
///
/// The label is the first populated display field, else the identifier.
/// Returns `None` for records with neither.
pub fn candidate_from_record(record: &Record, table: &str) -> Option<ReferenceCandidate> {
    let label = DISPLAY_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(value_text));
    let identifier = record.get(IDENTIFIER_FIELD).and_then(value_text);
    let (identifier, display_label) = match (identifier, label) {
        (Some(id), Some(label)) => (id, label),
        (Some(id), None) => (id.clone(), id),
        (None, Some(label)) => (label.clone(), label),
        (None, None) => return None,
    };
    Some(ReferenceCandidate {
        identifier,
        display_label,
        source_table: table.to_string(),
    })
}

/// Result of one dispatched search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub seq: u64,
    pub table: String,
    pub query: String,
    pub outcome: Result<Vec<ReferenceCandidate>, String>,
}

/// Spawns reference searches onto a tokio runtime.
#[derive(Clone)]
pub struct SearchDispatcher {
    source: Arc<dyn RecordSource>,
    runtime: Handle,
    tx: UnboundedSender<SearchResponse>,
    latest: Arc<AtomicU64>,
    next_seq: Arc<AtomicU64>,
    timeout: Duration,
    debounce: Duration,
    limit: usize,
}

impl std::fmt::Debug for SearchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDispatcher")
            .field("source", &"<record source>")
            .field("latest", &self.latest.load(Ordering::Acquire))
            .field("next_seq", &self.next_seq.load(Ordering::Acquire))
            .field("timeout", &self.timeout)
            .field("debounce", &self.debounce)
            .field("limit", &self.limit)
            .finish()
    }
}

impl SearchDispatcher {
    pub fn new(
        source: Arc<dyn RecordSource>,
        runtime: Handle,
        tx: UnboundedSender<SearchResponse>,
        config: &BuilderConfig,
    ) -> Self {
        SearchDispatcher {
            source,
            runtime,
            tx,
            latest: Arc::new(AtomicU64::new(0)),
            next_seq: Arc::new(AtomicU64::new(0)),
            timeout: config.search_timeout(),
            debounce: config.search_debounce(),
            limit: config.reference_limit,
        }
    }

    /// Allocates the next sequence number, unique across resolvers.
    pub fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Marks `seq` as the newest search, superseding pending ones.
    pub fn invalidate(&self, seq: u64) {
        self.latest.store(seq, Ordering::Release);
    }

    /// Starts a search for `text` in `table`, tagged with `seq`.
    pub fn dispatch(&self, seq: u64, table: &str, text: &str) {
        self.invalidate(seq);
        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let table = table.to_string();
        let query = text.to_string();
        let params = list_params(text, self.limit);
        let timeout = self.timeout;
        let debounce = self.debounce;

        self.runtime.spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if latest.load(Ordering::Acquire) != seq {
                    tracing::trace!(seq, "reference search superseded before dispatch");
                    return;
                }
            }

            tracing::debug!(seq, %table, %query, "reference search dispatched");
            let blocking_table = table.clone();
            // A timed-out listing is not cancelled; its blocking thread runs
            // to completion in the background and the result is dropped.
            let call = tokio::task::spawn_blocking(move || source.list(&blocking_table, &params));
            let outcome = match tokio::time::timeout(timeout, call).await {
                Err(_) => Err(Error::Timeout(timeout.as_millis() as u64).to_string()),
                Ok(Err(join)) => Err(format!("search task failed: {join}")),
                Ok(Ok(Err(e))) => Err(e.to_string()),
                Ok(Ok(Ok(records))) => Ok(records
                    .iter()
                    .filter_map(|r| candidate_from_record(r, &table))
                    .collect()),
            };

            let response = SearchResponse {
                seq,
                table,
                query,
                outcome,
            };
            if tx.send(response).is_err() {
                tracing::trace!(seq, "reference search finished after receiver closed");
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    TooShort,
    Searching,
    Ready,
    NoResults,
    Failed(String),
    /// No record source is connected; typed text is used as is.
    Offline,
}

/// The reference search child state machine.
#[derive(Debug)]
pub struct ReferenceResolver {
    table: String,
    input: TextInput,
    results: Picker<ReferenceCandidate>,
    dispatcher: Option<SearchDispatcher>,
    seq: u64,
    min_chars: usize,
    status: SearchStatus,
    choice: Option<(String, Option<String>)>,
    active: bool,
}

impl ReferenceResolver {
    pub fn new(
        table: impl Into<String>,
        min_chars: usize,
        dispatcher: Option<SearchDispatcher>,
    ) -> Self {
        ReferenceResolver {
            table: table.into(),
            input: TextInput::with_placeholder("type to search"),
            results: Picker::new(Vec::new()),
            dispatcher,
            seq: 0,
            min_chars,
            status: SearchStatus::Idle,
            choice: None,
            active: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.input.clear();
        self.results.set_items(Vec::new());
        self.choice = None;
        self.status = if self.dispatcher.is_some() {
            SearchStatus::Idle
        } else {
            SearchStatus::Offline
        };
    }

    /// Re-enters with the previous text and results intact.
    pub fn resume(&mut self) {
        self.active = true;
        self.choice = None;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Sequence number of the latest input change.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    pub fn candidates(&self) -> usize {
        self.results.len()
    }

    /// The chosen `(value, display label)` once the resolver is done.
    pub fn take_choice(&mut self) -> Option<(String, Option<String>)> {
        self.choice.take()
    }

    pub fn update(&mut self, key: Key) -> Transition {
        if !self.active {
            return Transition::Cancelled;
        }
        match key {
            Key::Enter => self.confirm(),
            Key::Esc => {
                self.deactivate();
                Transition::Cancelled
            }
            Key::Up | Key::Down | Key::PageUp | Key::PageDown => {
                self.results.handle(key);
                Transition::Continue
            }
            other => {
                if self.input.handle(other) {
                    self.input_changed();
                }
                Transition::Continue
            }
        }
    }

    fn confirm(&mut self) -> Transition {
        if let Some(candidate) = self.results.selected() {
            self.choice = Some((
                candidate.identifier.clone(),
                Some(candidate.display_label.clone()),
            ));
        } else {
            let typed = self.input.text().trim();
            if typed.is_empty() {
                return Transition::Continue;
            }
            tracing::debug!(table = %self.table, "reference value typed without a match");
            self.choice = Some((typed.to_string(), None));
        }
        self.deactivate();
        Transition::Done
    }

    fn input_changed(&mut self) {
        self.results.set_items(Vec::new());
        let text = self.input.text().trim().to_string();

        let Some(dispatcher) = &self.dispatcher else {
            self.seq += 1;
            self.status = SearchStatus::Offline;
            return;
        };
        self.seq = dispatcher.next_seq();
        if text.chars().count() < self.min_chars {
            dispatcher.invalidate(self.seq);
            self.status = if text.is_empty() {
                SearchStatus::Idle
            } else {
                SearchStatus::TooShort
            };
            return;
        }
        dispatcher.dispatch(self.seq, &self.table, &text);
        self.status = SearchStatus::Searching;
    }

    /// Applies a search response. Returns false if it was stale.
    pub fn receive(&mut self, response: SearchResponse) -> bool {
        if response.seq != self.seq
            || response.table != self.table
            || response.query != self.input.text().trim()
        {
            tracing::debug!(
                seq = response.seq,
                latest = self.seq,
                query = %response.query,
                "discarding stale reference search response"
            );
            return false;
        }
        match response.outcome {
            Ok(candidates) if candidates.is_empty() => {
                self.results.set_items(Vec::new());
                self.status = SearchStatus::NoResults;
            }
            Ok(candidates) => {
                tracing::debug!(seq = response.seq, count = candidates.len(), "reference search completed");
                let items = candidates
                    .into_iter()
                    .map(|c| {
                        let label = if c.display_label == c.identifier {
                            c.display_label.clone()
                        } else {
                            format!("{}  ({})", c.display_label, c.identifier)
                        };
                        (label, c)
                    })
                    .collect();
                self.results.set_items(items);
                self.status = SearchStatus::Ready;
            }
            Err(message) => {
                tracing::warn!(seq = response.seq, error = %message, "reference search failed");
                self.results.set_items(Vec::new());
                self.status = SearchStatus::Failed(message);
            }
        }
        true
    }

    pub fn view(&self) -> String {
        let mut out = format!("Search {}\n  > {}\n", self.table, self.input.render());
        let status = match &self.status {
            SearchStatus::Idle | SearchStatus::TooShort => {
                format!("type at least {} characters", self.min_chars)
            }
            SearchStatus::Searching => "searching…".to_string(),
            SearchStatus::Ready => format!("{} matches", self.results.len()),
            SearchStatus::NoResults => "no matches, Enter uses the typed text".to_string(),
            SearchStatus::Failed(e) => format!("search failed: {e}; Enter uses the typed text"),
            SearchStatus::Offline => "not connected, Enter uses the typed text".to_string(),
        };
        out.push_str(&format!("  {status}\n"));
        if !self.results.is_empty() {
            out.push_str(&self.results.render("Matches"));
        }
        out.push_str("↑/↓: Choose  Enter: Use  Esc: Back\n");
        out
    }
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
