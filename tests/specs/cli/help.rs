// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help output tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[parameterized(
    long = { "--help" },
    short = { "-h" },
)]
fn help_flag_succeeds(flag: &str) {
    banter()
        .arg(flag)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: banter"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--user-id"));
}

#[test]
fn long_help_lists_session_commands() {
    banter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("/examples"))
        .stdout(predicate::str::contains("/reconnect"))
        .stdout(predicate::str::contains("/quit"));
}

#[test]
fn unknown_flag_fails() {
    banter()
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}
