// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Toolkit-independent key input.
//!
//! Drivers translate their terminal events into [`Key`] values; the state
//! machines never see a terminal type.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// A character typed with Control held.
    Ctrl(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

impl Key {
    /// The decimal digit this key types, if any.
    pub fn digit(self) -> Option<u32> {
        match self {
            Key::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}
