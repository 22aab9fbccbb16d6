// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;

use crate::config::SessionConfig;
use crate::error::Result;

fn non_empty_string(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "banter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for a conversational banking assistant")]
#[command(long_about = "Terminal client for a conversational banking assistant.\n\n\
    Keeps a WebSocket session open to the assistant service, reconnecting with \
    exponential backoff when the connection drops.")]
#[command(after_help = "\
Commands (inside a session):
  /examples     List example prompts
  /1 .. /6      Send an example prompt
  /clear        Clear the message history
  /reconnect    Reconnect now
  /disconnect   Close the connection
  /quit         Leave the session

Examples:
  banter                                   Connect with config.toml or defaults
  banter --url wss://bank.example.com/ws   Connect to another service
  banter --user-id alice -v                Connect as alice with debug logs")]
pub struct Cli {
    /// WebSocket endpoint (overrides config.toml)
    #[arg(long, value_name = "url")]
    pub url: Option<String>,

    /// User identifier sent to the service (overrides config.toml)
    #[arg(long = "user-id", value_name = "id", value_parser = non_empty_string)]
    pub user_id: Option<String>,

    /// Read configuration from <path> instead of the default location
    #[arg(short = 'c', long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the session configuration: file values first, then flags.
    pub fn resolve_config(&self) -> Result<SessionConfig> {
        let mut config = SessionConfig::load_or_default(self.config.as_deref())?;
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.user_id = user_id.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
