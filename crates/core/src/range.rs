// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Date range picker: a start calendar, an end calendar and presets.
//!
//! Confirming the start day hands over to the end calendar. Confirming the
//! end day checks ordering; a bad end re-opens the end calendar with an
//! inline error. Presets complete at once since they are ordered by
//! construction.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::{Calendar, CalendarMode};
use crate::datetime::{add_months, end_of_day, format_instant, range_expression, start_of_day, week_start};
use crate::grammar::Operator;
use crate::key::Key;
use crate::widget::{Picker, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    StartDate,
    EndDate,
    Presets,
}

/// A range relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Today,
        Preset::Yesterday,
        Preset::Last7Days,
        Preset::Last30Days,
        Preset::ThisWeek,
        Preset::ThisMonth,
        Preset::LastMonth,
        Preset::ThisYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Today => "Today",
            Preset::Yesterday => "Yesterday",
            Preset::Last7Days => "Last 7 days",
            Preset::Last30Days => "Last 30 days",
            Preset::ThisWeek => "This week",
            Preset::ThisMonth => "This month",
            Preset::LastMonth => "Last month",
            Preset::ThisYear => "This year",
        }
    }

    /// First and last day covered, inclusive.
    pub fn days(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Preset::Today => (today, today),
            Preset::Yesterday => {
                let d = today - Duration::days(1);
                (d, d)
            }
            Preset::Last7Days => (today - Duration::days(6), today),
            Preset::Last30Days => (today - Duration::days(29), today),
            Preset::ThisWeek => {
                let monday = week_start(today);
                (monday, monday + Duration::days(6))
            }
            Preset::ThisMonth => month_days(today),
            Preset::LastMonth => month_days(add_months(today, -1)),
            Preset::ThisYear => year_days(today.year()),
        }
    }

    /// 00:00:00 of the first day to 23:59:59 of the last.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let (first, last) = self.days(today);
        (start_of_day(first), end_of_day(last))
    }
}

fn month_days(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = add_months(first, 1) - Duration::days(1);
    (first, last)
}

fn year_days(year: i32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (first, last)
}

/// The instant window a date keyword operator covers.
pub fn keyword_window(op: Operator, today: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let (first, last) = match op {
        Operator::Today => Preset::Today.days(today),
        Operator::Yesterday => Preset::Yesterday.days(today),
        Operator::ThisWeek => Preset::ThisWeek.days(today),
        Operator::LastWeek => Preset::ThisWeek.days(today - Duration::days(7)),
        Operator::ThisMonth => Preset::ThisMonth.days(today),
        Operator::LastMonth => Preset::LastMonth.days(today),
        Operator::ThisYear => Preset::ThisYear.days(today),
        Operator::LastYear => year_days(today.year() - 1),
        _ => return None,
    };
    Some((start_of_day(first), end_of_day(last)))
}

/// Checks that `end` may follow `start`.
pub fn check_order(
    start: NaiveDateTime,
    end: NaiveDateTime,
    allow_same_day: bool,
) -> Result<(), String> {
    if end < start {
        return Err(format!(
            "end {} is before start {}",
            format_instant(end),
            format_instant(start)
        ));
    }
    if !allow_same_day && end.date() <= start.date() {
        return Err("end must fall on a later day than start".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DateRangePicker {
    now: NaiveDateTime,
    start: Calendar,
    end: Calendar,
    presets: Picker<Preset>,
    mode: RangeMode,
    return_mode: RangeMode,
    allow_same_day: bool,
    range: Option<(NaiveDateTime, NaiveDateTime)>,
    error: Option<String>,
    active: bool,
}

impl DateRangePicker {
    pub fn new(now: NaiveDateTime) -> Self {
        let mut end = Calendar::new(now).with_title("End date");
        end.set_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
        let presets = Picker::new(
            Preset::ALL
                .iter()
                .map(|p| (p.label().to_string(), *p))
                .collect(),
        );
        DateRangePicker {
            now,
            start: Calendar::new(now).with_title("Start date"),
            end,
            presets,
            mode: RangeMode::StartDate,
            return_mode: RangeMode::StartDate,
            allow_same_day: true,
            range: None,
            error: None,
            active: false,
        }
    }

    pub fn with_time(mut self, show_time: bool) -> Self {
        self.start = self.start.with_time(show_time);
        self.end = self.end.with_time(show_time);
        self
    }

    pub fn allow_same_day(mut self, allow: bool) -> Self {
        self.allow_same_day = allow;
        self
    }

    pub fn activate(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.active = true;
        self.error = None;
        self.mode = RangeMode::StartDate;
        self.start.activate(now);
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.start.deactivate();
        self.end.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> RangeMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The completed range, if any.
    pub fn range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.range
    }

    pub fn set_range(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.start.set_instant(start);
        self.end.set_instant(end);
        self.range = Some((start, end));
    }

    pub fn range_expression(&self) -> Option<String> {
        self.range.map(|(start, end)| range_expression(start, end))
    }

    fn current_calendar(&self) -> Option<&Calendar> {
        match self.mode {
            RangeMode::StartDate => Some(&self.start),
            RangeMode::EndDate => Some(&self.end),
            RangeMode::Presets => None,
        }
    }

    pub fn update(&mut self, key: Key) -> Transition {
        if !self.active {
            return Transition::Cancelled;
        }

        let in_day_grid = self
            .current_calendar()
            .is_some_and(|c| c.mode() == CalendarMode::Month);
        if key == Key::Tab && in_day_grid {
            self.return_mode = self.mode;
            self.mode = RangeMode::Presets;
            return Transition::Continue;
        }

        match self.mode {
            RangeMode::Presets => self.update_presets(key),
            RangeMode::StartDate => self.update_start(key),
            RangeMode::EndDate => self.update_end(key),
        }
    }

    fn update_presets(&mut self, key: Key) -> Transition {
        match key {
            Key::Enter => {
                let Some(preset) = self.presets.selected().copied() else {
                    return Transition::Continue;
                };
                let (start, end) = preset.bounds(self.now.date());
                self.set_range(start, end);
                tracing::debug!(preset = preset.label(), "date range preset applied");
                self.deactivate();
                Transition::Done
            }
            Key::Esc | Key::Tab => {
                self.mode = self.return_mode;
                Transition::Continue
            }
            other => {
                self.presets.handle(other);
                Transition::Continue
            }
        }
    }

    fn update_start(&mut self, key: Key) -> Transition {
        match self.start.update(key) {
            Transition::Continue => Transition::Continue,
            Transition::Cancelled => {
                self.deactivate();
                Transition::Cancelled
            }
            Transition::Done => {
                self.error = None;
                if let Some(start) = self.start.selected() {
                    let min = if self.allow_same_day {
                        start
                    } else {
                        start + Duration::days(1)
                    };
                    self.end.set_bounds(Some(min), None);
                    if self.end.selected().map_or(true, |end| end < min) {
                        self.end.clear_selection();
                        self.end.focus(min);
                    }
                }
                self.mode = RangeMode::EndDate;
                self.end.activate(self.now);
                Transition::Continue
            }
        }
    }

    fn update_end(&mut self, key: Key) -> Transition {
        match self.end.update(key) {
            Transition::Continue => Transition::Continue,
            Transition::Cancelled => {
                self.mode = RangeMode::StartDate;
                self.start.activate(self.now);
                Transition::Continue
            }
            Transition::Done => {
                let (Some(start), Some(end)) =
                    (self.start.selected_instant(), self.end.selected_instant())
                else {
                    self.end.activate(self.now);
                    return Transition::Continue;
                };
                match check_order(start, end, self.allow_same_day) {
                    Ok(()) => {
                        self.range = Some((start, end));
                        self.error = None;
                        self.deactivate();
                        Transition::Done
                    }
                    Err(message) => {
                        tracing::debug!(%message, "date range rejected");
                        self.end.activate(self.now);
                        self.end.set_error(message.clone());
                        self.error = Some(message);
                        Transition::Continue
                    }
                }
            }
        }
    }

    pub fn view(&self) -> String {
        let show = |c: &Calendar| {
            c.format_for_backend()
                .unwrap_or_else(|| "not set".to_string())
        };
        let mut out = format!(
            "Date range\nFrom: {}\nTo:   {}\n\n",
            show(&self.start),
            show(&self.end)
        );
        match self.mode {
            RangeMode::StartDate => out.push_str(&self.start.view()),
            RangeMode::EndDate => out.push_str(&self.end.view()),
            RangeMode::Presets => {
                out.push_str(&self.presets.render("Presets"));
                out.push_str("↑/↓: Navigate  Enter: Apply  Esc/Tab: Back\n");
            }
        }
        if self.mode != RangeMode::Presets {
            out.push_str("Tab: presets\n");
        }
        out
    }
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
