// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Date and time helpers shared by the pickers, validator and compiler.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// The backend's date-time format.
pub const BACKEND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The backend's date-only format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

const RANGE_PREFIX: &str = "javascript:gs.dateGenerate(";

pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(BACKEND_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses any accepted date or date-time literal.
///
/// Date-only inputs resolve to midnight.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(start_of_day(d));
        }
    }
    Err(Error::Parse {
        input: s.to_string(),
        expected: "a date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)",
    })
}

/// Like [`parse_instant`], but a date-only end bound resolves to 23:59:59.
pub fn parse_range_bound(s: &str, is_end: bool) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    if is_end {
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                return Ok(end_of_day(d));
            }
        }
    }
    parse_instant(trimmed)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 on `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(86_399)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

/// Shifts `date` by whole months, clamping the day to the target month.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Shifts `date` by whole years, clamping Feb 29.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years * 12)
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The range literal the backend evaluates for `BETWEEN`.
pub fn range_expression(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{RANGE_PREFIX}'{}')@{RANGE_PREFIX}'{}')",
        format_instant(start),
        format_instant(end)
    )
}

/// Parses a range literal back into its two instants.
///
/// Accepts the single-argument form [`range_expression`] writes and the
/// two-argument `'YYYY-MM-DD','HH:MM:SS'` form.
pub fn parse_range_expression(s: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let syntax = || Error::Syntax(format!("malformed date range '{s}'"));
    let (left, right) = s.split_once(")@").ok_or_else(syntax)?;
    let start = parse_generate_call(&format!("{left})"), false).ok_or_else(syntax)?;
    let end = parse_generate_call(right, true).ok_or_else(syntax)?;
    Ok((start, end))
}

fn parse_generate_call(call: &str, is_end: bool) -> Option<NaiveDateTime> {
    let args = call.trim().strip_prefix(RANGE_PREFIX)?.strip_suffix(')')?;
    let parts: Vec<&str> = args
        .split(',')
        .map(|p| p.trim().trim_matches('\''))
        .collect();
    match parts.as_slice() {
        [instant] => parse_range_bound(instant, is_end).ok(),
        [date, time] => parse_instant(&format!("{date} {time}")).ok(),
        _ => None,
    }
}

/// True if `s` looks like a range literal.
pub fn is_range_expression(s: &str) -> bool {
    s.trim_start().starts_with(RANGE_PREFIX)
}

#[cfg(test)]
#[path = "datetime_tests.rs"]
mod tests;
