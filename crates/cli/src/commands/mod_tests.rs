// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use nowq_core::validate_raw_query;

#[test]
fn warnings_alone_do_not_fail() {
    let report = validate_raw_query("short_descriptionCONTAINSa^ORshort_descriptionCONTAINSb");
    assert!(fail_on_errors(&report).is_ok());
}

#[test]
fn errors_fail_with_count() {
    let report = validate_raw_query("priority=1^^active=true");
    let err = fail_on_errors(&report).unwrap_err();
    assert!(matches!(err, Error::InvalidQuery { errors } if errors >= 1));
}
