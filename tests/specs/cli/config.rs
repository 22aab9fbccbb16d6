// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration error tests.
//!
//! Every case here fails before any connection is attempted.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[parameterized(
    http = { "http://localhost:8000/ws" },
    https = { "https://bank.example.com/ws" },
)]
fn non_websocket_url_is_rejected(url: &str) {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg(url)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: unsupported url scheme"))
        .stderr(predicate::str::contains("hint: the endpoint must use ws:// or wss://"));
}

#[test]
fn unparseable_url_is_rejected() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--url")
        .arg("not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid endpoint url"));
}

#[test]
fn blank_user_id_is_rejected() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp).arg("--user-id").arg(" ").assert().failure();
}

#[test]
fn missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    banter_in(&temp)
        .arg("--config")
        .arg(temp.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("io error"));
}

#[test]
fn malformed_config_file_fails() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "url = [");
    banter_in(&temp)
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn config_file_scheme_is_validated() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, r#"url = "ftp://bank.example.com/ws""#);
    banter_in(&temp)
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported url scheme 'ftp'"));
}

#[cfg(target_os = "linux")]
#[test]
fn default_config_location_is_read() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("banter");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), r#"url = "http://localhost/ws""#).unwrap();

    banter_in(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported url scheme 'http'"));
}
