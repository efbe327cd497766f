// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-date picker.
//!
//! Three modes share one cursor date:
//!
//! - **Month**: a day grid. ←/→ move a day, ↑/↓ a week, PgUp/PgDn a month,
//!   `[`/`]` a year, `y` opens the year grid, `t` jumps to today.
//! - **Year**: a 4×3 grid around the cursor's decade.
//! - **Time**: hour, minute and second buffers edited with digits or ↑/↓.
//!
//! Enter on a day either completes or, with time entry enabled, moves on to
//! Time mode. Enter in Time mode completes.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::datetime::{add_months, add_years, days_in_month, format_instant};
use crate::key::Key;
use crate::widget::Transition;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    Month,
    Year,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hour,
    Minute,
    Second,
}

impl TimeField {
    fn modulus(self) -> u32 {
        match self {
            TimeField::Hour => 24,
            TimeField::Minute | TimeField::Second => 60,
        }
    }

    fn next(self) -> Self {
        match self {
            TimeField::Hour => TimeField::Minute,
            TimeField::Minute => TimeField::Second,
            TimeField::Second => TimeField::Hour,
        }
    }

    fn prev(self) -> Self {
        match self {
            TimeField::Hour => TimeField::Second,
            TimeField::Minute => TimeField::Hour,
            TimeField::Second => TimeField::Minute,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    now: NaiveDateTime,
    cursor: NaiveDate,
    selected: Option<NaiveDate>,
    hour: u32,
    minute: u32,
    second: u32,
    time_field: TimeField,
    mode: CalendarMode,
    year_cursor: i32,
    show_time: bool,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
    title: String,
    error: Option<String>,
    active: bool,
}

impl Calendar {
    /// An inactive calendar focused on `now`, with time at midnight.
    pub fn new(now: NaiveDateTime) -> Self {
        Calendar {
            now,
            cursor: now.date(),
            selected: None,
            hour: 0,
            minute: 0,
            second: 0,
            time_field: TimeField::Hour,
            mode: CalendarMode::Month,
            year_cursor: now.year(),
            show_time: true,
            min: None,
            max: None,
            title: "Select date".to_string(),
            error: None,
            active: false,
        }
    }

    pub fn with_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    pub fn with_bounds(mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn set_bounds(&mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) {
        self.min = min;
        self.max = max;
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Starts routing keys here, with a fresh notion of "now".
    pub fn activate(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.active = true;
        self.mode = CalendarMode::Month;
        self.time_field = TimeField::Hour;
        self.error = None;
        if let Some(selected) = self.selected {
            self.cursor = selected;
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.mode = CalendarMode::Month;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> CalendarMode {
        self.mode
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn focus(&mut self, date: NaiveDate) {
        self.cursor = date;
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn set_selected(&mut self, date: NaiveDate) {
        self.selected = Some(date);
        self.cursor = date;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.hour = time.hour();
        self.minute = time.minute();
        self.second = time.second();
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second).unwrap_or(NaiveTime::MIN)
    }

    /// Selects the date and time of `instant`.
    pub fn set_instant(&mut self, instant: NaiveDateTime) {
        self.set_selected(instant.date());
        self.set_time(instant.time());
    }

    /// The selected day combined with the time buffers.
    pub fn selected_instant(&self) -> Option<NaiveDateTime> {
        self.selected.map(|d| d.and_time(self.time()))
    }

    pub fn format_for_backend(&self) -> Option<String> {
        self.selected_instant().map(format_instant)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Shows an inline error until the next key.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn update(&mut self, key: Key) -> Transition {
        if !self.active {
            return Transition::Cancelled;
        }
        self.error = None;
        match self.mode {
            CalendarMode::Month => self.update_month(key),
            CalendarMode::Year => {
                self.update_year(key);
                Transition::Continue
            }
            CalendarMode::Time => self.update_time(key),
        }
    }

    fn update_month(&mut self, key: Key) -> Transition {
        match key {
            Key::Left => self.cursor -= Duration::days(1),
            Key::Right => self.cursor += Duration::days(1),
            Key::Up => self.cursor -= Duration::days(7),
            Key::Down => self.cursor += Duration::days(7),
            Key::PageUp => self.cursor = add_months(self.cursor, -1),
            Key::PageDown => self.cursor = add_months(self.cursor, 1),
            Key::Char('[') => self.cursor = add_years(self.cursor, -1),
            Key::Char(']') => self.cursor = add_years(self.cursor, 1),
            Key::Home => self.cursor = self.cursor.with_day(1).unwrap_or(self.cursor),
            Key::End => {
                let last = days_in_month(self.cursor.year(), self.cursor.month());
                self.cursor = self.cursor.with_day(last).unwrap_or(self.cursor);
            }
            Key::Char('y') => {
                self.year_cursor = self.cursor.year();
                self.mode = CalendarMode::Year;
            }
            Key::Char('t') => {
                let today = self.now.date();
                self.cursor = today;
                if self.is_selectable(today) {
                    self.selected = Some(today);
                    self.set_time(self.now.time());
                } else {
                    self.error = Some(self.bounds_message());
                }
            }
            Key::Enter => return self.confirm_day(),
            Key::Esc => {
                self.deactivate();
                return Transition::Cancelled;
            }
            _ => {}
        }
        Transition::Continue
    }

    fn confirm_day(&mut self) -> Transition {
        if !self.is_selectable(self.cursor) {
            self.error = Some(self.bounds_message());
            return Transition::Continue;
        }
        self.selected = Some(self.cursor);
        if self.show_time {
            self.mode = CalendarMode::Time;
            self.time_field = TimeField::Hour;
            Transition::Continue
        } else {
            self.deactivate();
            Transition::Done
        }
    }

    fn bounds_message(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("pick a date between {min} and {max}"),
            (Some(min), None) => format!("pick a date on or after {min}"),
            (None, Some(max)) => format!("pick a date on or before {max}"),
            (None, None) => "date is not selectable".to_string(),
        }
    }

    fn update_year(&mut self, key: Key) {
        match key {
            Key::Left => self.year_cursor -= 1,
            Key::Right => self.year_cursor += 1,
            Key::Up => self.year_cursor -= 4,
            Key::Down => self.year_cursor += 4,
            Key::PageUp => self.year_cursor -= 10,
            Key::PageDown => self.year_cursor += 10,
            Key::Enter => {
                let years = self.year_cursor - self.cursor.year();
                self.cursor = add_years(self.cursor, years);
                self.mode = CalendarMode::Month;
            }
            Key::Esc => self.mode = CalendarMode::Month,
            _ => {}
        }
    }

    fn time_value(&mut self) -> &mut u32 {
        match self.time_field {
            TimeField::Hour => &mut self.hour,
            TimeField::Minute => &mut self.minute,
            TimeField::Second => &mut self.second,
        }
    }

    fn update_time(&mut self, key: Key) -> Transition {
        let modulus = self.time_field.modulus();
        match key {
            Key::Left | Key::BackTab => self.time_field = self.time_field.prev(),
            Key::Right | Key::Tab => self.time_field = self.time_field.next(),
            Key::Up => {
                let v = self.time_value();
                *v = (*v + 1) % modulus;
            }
            Key::Down => {
                let v = self.time_value();
                *v = (*v + modulus - 1) % modulus;
            }
            Key::Backspace => {
                let v = self.time_value();
                *v /= 10;
            }
            Key::Enter => {
                self.deactivate();
                return Transition::Done;
            }
            Key::Esc => self.mode = CalendarMode::Month,
            other => {
                if let Some(d) = other.digit() {
                    let v = self.time_value();
                    let shifted = (*v % 10) * 10 + d;
                    if shifted < modulus {
                        *v = shifted;
                    }
                }
            }
        }
        Transition::Continue
    }

    pub fn view(&self) -> String {
        let mut out = format!("{}\n", self.title);
        match self.mode {
            CalendarMode::Year => self.render_years(&mut out),
            CalendarMode::Month | CalendarMode::Time => self.render_month(&mut out),
        }
        if self.show_time {
            out.push_str(&format!("Time: {}\n", self.render_time()));
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("! {error}\n"));
        }
        out.push_str(match self.mode {
            CalendarMode::Month => {
                "←→↑↓: day/week  PgUp/PgDn: month  [ ]: year  y: years  t: today  Enter: select  Esc: back"
            }
            CalendarMode::Year => "←→↑↓: year  PgUp/PgDn: decade  Enter: pick  Esc: back",
            CalendarMode::Time => "←→/Tab: field  ↑↓: adjust  0-9: type  Enter: confirm  Esc: back",
        });
        out.push('\n');
        out
    }

    fn render_month(&self, out: &mut String) {
        let year = self.cursor.year();
        let month = self.cursor.month();
        let name = MONTH_NAMES
            .get(self.cursor.month0() as usize)
            .copied()
            .unwrap_or("");
        out.push_str(&format!("{name} {year}\n"));
        out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su\n");

        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return;
        };
        let offset = first.weekday().num_days_from_monday() as usize;
        let mut line = "    ".repeat(offset);
        let mut column = offset;
        for day in 1..=days_in_month(year, month) {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let cell = if date == self.cursor {
                format!("[{day:>2}]")
            } else if !self.is_selectable(date) {
                format!("({day:>2})")
            } else if Some(date) == self.selected {
                format!("<{day:>2}>")
            } else if date == self.now.date() {
                format!(" {day:>2}*")
            } else {
                format!(" {day:>2} ")
            };
            line.push_str(&cell);
            column += 1;
            if column == 7 {
                out.push_str(line.trim_end());
                out.push('\n');
                line.clear();
                column = 0;
            }
        }
        if !line.is_empty() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    fn render_years(&self, out: &mut String) {
        let first = self.year_cursor - self.year_cursor.rem_euclid(10) - 1;
        for row in 0..3 {
            let cells: Vec<String> = (0..4)
                .map(|col| {
                    let year = first + row * 4 + col;
                    if year == self.year_cursor {
                        format!("[{year}]")
                    } else {
                        format!(" {year} ")
                    }
                })
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }
    }

    fn render_time(&self) -> String {
        let part = |field: TimeField, value: u32| {
            if self.mode == CalendarMode::Time && self.time_field == field {
                format!("[{value:02}]")
            } else {
                format!("{value:02}")
            }
        };
        format!(
            "{}:{}:{}",
            part(TimeField::Hour, self.hour),
            part(TimeField::Minute, self.minute),
            part(TimeField::Second, self.second)
        )
    }
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
