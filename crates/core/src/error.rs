// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for banter-core operations.

use thiserror::Error;

/// Reasons an inbound frame is rejected.
///
/// A rejected frame never reaches the message store; callers log the error
/// and drop the payload.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid frame: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid frame: expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid frame: field '{field}' must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid frame: unparseable timestamp '{0}'\n  hint: expected ISO-8601, e.g. 2026-01-01T12:00:00Z")]
    InvalidTimestamp(String),
}

/// Result type for banter-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
