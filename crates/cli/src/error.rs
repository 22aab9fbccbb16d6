// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::session::SessionError;

/// All possible errors that can occur in the banter client.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config file: {0}\n  hint: check the syntax of config.toml")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid endpoint url: {0}\n  hint: use a full url such as ws://localhost:8000/ws")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported url scheme '{0}'\n  hint: the endpoint must use ws:// or wss://")]
    UnsupportedScheme(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
