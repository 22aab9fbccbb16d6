// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive session tests against an endpoint nobody listens on.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use super::common::*;

#[test]
fn quit_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg(UNREACHABLE_URL)
        .write_stdin("/quit\n")
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("/examples for ideas"));
}

#[test]
fn end_of_input_exits_cleanly() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg(UNREACHABLE_URL)
        .write_stdin("")
        .timeout(Duration::from_secs(10))
        .assert()
        .success();
}

#[test]
fn examples_are_listed() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg(UNREACHABLE_URL)
        .write_stdin("/examples\n/quit\n")
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("/1  What's my account balance?"))
        .stdout(predicate::str::contains("/6  Transfer $500 to savings"));
}

#[test]
fn sending_without_connection_reports_error() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg(UNREACHABLE_URL)
        .write_stdin("Show my recent transactions\n/quit\n")
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("error: not connected"));
}
