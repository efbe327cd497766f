// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runs a [`ConditionBuilder`] on the terminal.
//!
//! The builder view is drawn inline below the prompt and redrawn in place.
//! Key events are polled so finished reference searches are picked up
//! between keystrokes.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use nowq_core::{BuilderEvent, ConditionBuilder, Key, Message};
use std::io::{self, Write};
use std::time::Duration;

use crate::error::Result;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maps a crossterm key event onto the builder's key model.
pub fn map_key(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    Some(match event.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    })
}

/// Runs the builder until it finishes or is cancelled.
///
/// Returns [`BuilderEvent::Finished`] or [`BuilderEvent::Cancelled`].
pub fn run(builder: &mut ConditionBuilder) -> Result<BuilderEvent> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    let _ = stdout.execute(cursor::Hide);

    let result = event_loop(builder, &mut stdout);

    let _ = stdout.execute(cursor::Show);
    let _ = terminal::disable_raw_mode();
    result
}

fn event_loop(builder: &mut ConditionBuilder, stdout: &mut io::Stdout) -> Result<BuilderEvent> {
    let mut drawn = draw(stdout, &builder.view(), 0)?;
    loop {
        let mut dirty = builder.drain_search_results();
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(key) = map_key(&key) {
                        match builder.update(Message::Key(key)) {
                            event @ (BuilderEvent::Finished(_) | BuilderEvent::Cancelled) => {
                                clear(stdout, drawn)?;
                                return Ok(event);
                            }
                            BuilderEvent::Committed(count) => {
                                tracing::debug!(count, "condition committed from terminal");
                                dirty = true;
                            }
                            BuilderEvent::Continue => dirty = true,
                        }
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
        if dirty {
            drawn = draw(stdout, &builder.view(), drawn)?;
        }
    }
}

/// Moves back over the previous frame and clears it.
fn clear(stdout: &mut io::Stdout, previous: u16) -> io::Result<()> {
    if previous > 0 {
        stdout.queue(cursor::MoveUp(previous))?;
    }
    stdout.queue(cursor::MoveToColumn(0))?;
    stdout.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    stdout.flush()
}

/// Redraws `view` over the previous frame. Returns the lines drawn.
fn draw(stdout: &mut io::Stdout, view: &str, previous: u16) -> io::Result<u16> {
    clear(stdout, previous)?;
    let mut lines: u16 = 0;
    for line in view.lines() {
        stdout.queue(Print(line))?;
        stdout.queue(Print("\r\n"))?;
        lines = lines.saturating_add(1);
    }
    stdout.flush()?;
    Ok(lines)
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
