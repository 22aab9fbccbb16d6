// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! banter - terminal client for a conversational banking assistant.
//!
//! This crate keeps a persistent WebSocket session to the assistant service
//! and exposes it to presentation code.
//!
//! # Main Components
//!
//! - [`Session`] / [`SessionHandle`] - session task and its cloneable handle
//! - [`SessionController`] - command surface (send, clear, reconnect, disconnect)
//! - [`ConnectionManager`] - connection lifecycle with automatic reconnect
//! - [`SessionConfig`] - endpoint, user id and backoff settings
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use banter::{Session, SessionConfig};
//! use banter_core::ConnectionState;
//!
//! let handle = Session::spawn(&SessionConfig::default())?;
//! handle.wait_for_state(ConnectionState::Connected).await?;
//! handle.send_message("What's my account balance?").await?;
//! ```

mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod terminal;

pub use cli::Cli;
pub use config::{ReconnectConfig, SessionConfig};
pub use error::{Error, Result};
pub use session::{
    ConnectionManager, Session, SessionController, SessionError, SessionEvent, SessionHandle,
};

/// Run an interactive session on stdin/stdout until the user quits.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let handle = Session::spawn(&config)?;

    let input = terminal::spawn_stdin_reader();
    let mut stdout = std::io::stdout();
    terminal::run(&handle, input, &mut stdout).await?;

    handle.disconnect().await?;
    Ok(())
}
