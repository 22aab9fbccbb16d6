// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// An endpoint nothing listens on.
pub const UNREACHABLE_URL: &str = "ws://127.0.0.1:9/ws";

pub fn banter() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("banter").unwrap()
}

/// `banter` with its config directory pointed at `temp`, so a user's own
/// config.toml never leaks into a test.
pub fn banter_in(temp: &TempDir) -> Command {
    let mut cmd = banter();
    cmd.env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Write `content` to `config.toml` inside `temp`.
pub fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}
