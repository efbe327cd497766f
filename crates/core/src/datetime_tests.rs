// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, mi, s).unwrap()
}

#[parameterized(
    full = { "2024-03-05 14:30:15", at(2024, 3, 5, 14, 30, 15) },
    iso = { "2024-03-05T14:30:15", at(2024, 3, 5, 14, 30, 15) },
    no_seconds = { "2024-03-05 14:30", at(2024, 3, 5, 14, 30, 0) },
    date_only = { "2024-03-05", at(2024, 3, 5, 0, 0, 0) },
    us = { "03/05/2024", at(2024, 3, 5, 0, 0, 0) },
    dotted = { "05.03.2024", at(2024, 3, 5, 0, 0, 0) },
    padded = { "  2024-03-05  ", at(2024, 3, 5, 0, 0, 0) },
)]
fn parse_instant_accepts_known_formats(input: &str, expected: NaiveDateTime) {
    assert_eq!(parse_instant(input).unwrap(), expected);
}

#[parameterized(
    words = { "next tuesday" },
    bad_day = { "2024-02-30" },
    empty = { "" },
)]
fn parse_instant_rejects_garbage(input: &str) {
    assert!(matches!(parse_instant(input), Err(Error::Parse { .. })));
}

#[test]
fn end_bound_of_a_bare_date_is_end_of_day() {
    assert_eq!(
        parse_range_bound("2024-03-05", true).unwrap(),
        at(2024, 3, 5, 23, 59, 59)
    );
    assert_eq!(
        parse_range_bound("2024-03-05", false).unwrap(),
        at(2024, 3, 5, 0, 0, 0)
    );
    assert_eq!(
        parse_range_bound("2024-03-05 10:00:00", true).unwrap(),
        at(2024, 3, 5, 10, 0, 0)
    );
}

#[parameterized(
    jan = { 2024, 1, 31 },
    feb_leap = { 2024, 2, 29 },
    feb = { 2023, 2, 28 },
    apr = { 2024, 4, 30 },
    dec = { 2024, 12, 31 },
)]
fn days_in_month_counts(year: i32, month: u32, days: u32) {
    assert_eq!(days_in_month(year, month), days);
}

#[parameterized(
    clamp_to_feb = { date(2024, 1, 31), 1, date(2024, 2, 29) },
    across_year = { date(2024, 12, 15), 1, date(2025, 1, 15) },
    backwards = { date(2024, 1, 15), -1, date(2023, 12, 15) },
    far_back = { date(2024, 3, 31), -13, date(2023, 2, 28) },
)]
fn add_months_clamps(start: NaiveDate, months: i32, expected: NaiveDate) {
    assert_eq!(add_months(start, months), expected);
}

#[test]
fn add_years_clamps_leap_day() {
    assert_eq!(add_years(date(2024, 2, 29), 1), date(2025, 2, 28));
}

#[test]
fn week_starts_on_monday() {
    // 2024-03-07 is a Thursday.
    assert_eq!(week_start(date(2024, 3, 7)), date(2024, 3, 4));
    assert_eq!(week_start(date(2024, 3, 4)), date(2024, 3, 4));
    assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 4));
}

#[test]
fn range_expression_is_bit_exact() {
    let expr = range_expression(at(2024, 1, 1, 0, 0, 0), at(2024, 1, 31, 23, 59, 59));
    assert_eq!(
        expr,
        "javascript:gs.dateGenerate('2024-01-01 00:00:00')@javascript:gs.dateGenerate('2024-01-31 23:59:59')"
    );
    assert!(is_range_expression(&expr));
}

#[test]
fn range_expression_parses_back() {
    let start = at(2024, 1, 1, 8, 0, 0);
    let end = at(2024, 1, 31, 17, 30, 0);
    let parsed = parse_range_expression(&range_expression(start, end)).unwrap();
    assert_eq!(parsed, (start, end));
}

#[test]
fn two_argument_range_form_parses() {
    let expr = "javascript:gs.dateGenerate('2024-01-01','00:00:00')@javascript:gs.dateGenerate('2024-01-31','23:59:59')";
    let (start, end) = parse_range_expression(expr).unwrap();
    assert_eq!(start, at(2024, 1, 1, 0, 0, 0));
    assert_eq!(end, at(2024, 1, 31, 23, 59, 59));
}

#[test]
fn malformed_range_is_a_syntax_error() {
    assert!(matches!(
        parse_range_expression("2024-01-01@2024-01-31"),
        Err(Error::Syntax(_))
    ));
}
