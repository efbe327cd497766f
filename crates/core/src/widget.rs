// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Small input primitives shared by the builder stages.

use crate::key::Key;

/// What a child state machine reports after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still active, keep routing keys here.
    Continue,
    /// Finished with a result the parent should read.
    Done,
    /// Backed out without a result.
    Cancelled,
}

/// A single-line text buffer with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    cursor: usize,
    placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        TextInput::default()
    }

    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        TextInput {
            placeholder: placeholder.into(),
            ..TextInput::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Applies an editing key. Returns true if the text changed.
    pub fn handle(&mut self, key: Key) -> bool {
        let len = self.text.chars().count();
        match key {
            Key::Char(c) if !c.is_control() => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                true
            }
            Key::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                true
            }
            Key::Delete if self.cursor < len => {
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                true
            }
            Key::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            Key::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            Key::Home => {
                self.cursor = 0;
                false
            }
            Key::End => {
                self.cursor = len;
                false
            }
            _ => false,
        }
    }

    /// Renders the buffer with a `│` cursor, or the placeholder when empty.
    pub fn render(&self) -> String {
        if self.text.is_empty() {
            return format!("│{}", self.placeholder);
        }
        let at = self.byte_index(self.cursor);
        format!("{}│{}", &self.text[..at], &self.text[at..])
    }
}

/// A cursor list with optional type-to-filter and multi-select.
#[derive(Debug, Clone)]
pub struct Picker<T> {
    items: Vec<(String, T)>,
    filter: Option<TextInput>,
    visible: Vec<usize>,
    cursor: usize,
    multi: bool,
    marked: Vec<bool>,
}

impl<T: Clone> Picker<T> {
    /// A plain list, navigated with arrows only.
    pub fn new(items: Vec<(String, T)>) -> Self {
        let mut picker = Picker {
            marked: vec![false; items.len()],
            items,
            filter: None,
            visible: Vec::new(),
            cursor: 0,
            multi: false,
        };
        picker.refilter();
        picker
    }

    /// A list that narrows as the user types.
    pub fn filterable(items: Vec<(String, T)>) -> Self {
        let mut picker = Picker::new(items);
        picker.filter = Some(TextInput::with_placeholder("type to filter"));
        picker
    }

    /// Space toggles marks on items.
    pub fn multi_select(mut self) -> Self {
        self.multi = true;
        self
    }

    pub fn set_items(&mut self, items: Vec<(String, T)>) {
        self.marked = vec![false; items.len()];
        self.items = items;
        self.cursor = 0;
        self.refilter();
    }

    pub fn filter_text(&self) -> &str {
        self.filter.as_ref().map(TextInput::text).unwrap_or("")
    }

    pub fn clear_filter(&mut self) {
        if let Some(filter) = &mut self.filter {
            filter.clear();
        }
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.filter_text().to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, (label, _))| needle.is_empty() || label.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        if self.cursor >= self.visible.len() {
            self.cursor = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The item under the cursor.
    pub fn selected(&self) -> Option<&T> {
        self.visible
            .get(self.cursor)
            .and_then(|&i| self.items.get(i))
            .map(|(_, value)| value)
    }

    /// Marked items in list order.
    pub fn marked(&self) -> Vec<T> {
        self.items
            .iter()
            .zip(&self.marked)
            .filter(|(_, marked)| **marked)
            .map(|((_, value), _)| value.clone())
            .collect()
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Handles navigation, marking and filter keys.
    ///
    /// Enter and Esc are left to the owner. Returns true if anything changed.
    pub fn handle(&mut self, key: Key) -> bool {
        let len = self.visible.len();
        match key {
            Key::Up if len > 0 => {
                self.cursor = (self.cursor + len - 1) % len;
                true
            }
            Key::Down if len > 0 => {
                self.cursor = (self.cursor + 1) % len;
                true
            }
            Key::PageUp | Key::Home => {
                self.cursor = 0;
                true
            }
            Key::PageDown | Key::End => {
                self.cursor = len.saturating_sub(1);
                true
            }
            Key::Char(' ') if self.multi => {
                if let Some(&i) = self.visible.get(self.cursor) {
                    if let Some(mark) = self.marked.get_mut(i) {
                        *mark = !*mark;
                    }
                }
                true
            }
            _ => {
                let changed = match &mut self.filter {
                    Some(filter) => filter.handle(key),
                    None => false,
                };
                if changed {
                    self.cursor = 0;
                    self.refilter();
                }
                changed
            }
        }
    }

    /// Renders the list with `●`/`○` markers for the cursor row.
    pub fn render(&self, title: &str) -> String {
        let mut out = format!("{title}\n");
        if let Some(filter) = &self.filter {
            out.push_str(&format!("  > {}\n", filter.render()));
        }
        if self.visible.is_empty() {
            out.push_str("  (no matches)\n");
        }
        for (row, &i) in self.visible.iter().enumerate() {
            let cursor = if row == self.cursor { "●" } else { "○" };
            let mark = match (self.multi, self.marked.get(i).copied().unwrap_or(false)) {
                (false, _) => "",
                (true, true) => "[x] ",
                (true, false) => "[ ] ",
            };
            out.push_str(&format!("  {cursor} {mark}{}\n", self.items[i].0));
        }
        out
    }
}

#[cfg(test)]
#[path = "widget_tests.rs"]
mod tests;
