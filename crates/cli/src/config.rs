// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session configuration.
//!
//! Configuration is read from `config.toml` in the user's config directory
//! (e.g. `~/.config/banter/config.toml`) and includes:
//! - `url`: WebSocket endpoint of the conversational service
//! - `user_id`: Opaque user identifier sent as the `user_id` query parameter
//! - `[reconnect]`: Backoff tuning for automatic reconnection
//!
//! Every field is optional; command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use banter_core::policy::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY};
use banter_core::ReconnectPolicy;
use url::Url;

use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "banter";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default endpoint of the conversational service.
pub const DEFAULT_URL: &str = "ws://localhost:8000/ws";

/// Default user identifier.
pub const DEFAULT_USER_ID: &str = "user_demo1";

/// Session configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    #[serde(default = "default_url")]
    pub url: String,
    /// Opaque user identifier appended to the endpoint.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Automatic reconnection settings.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Automatic reconnection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Base delay for exponential backoff (milliseconds, default: 1000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum delay between attempts (milliseconds, default: 30000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Automatic attempts before giving up (default: 5, 0 disables retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY.as_millis() as u64
}

fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY.as_millis() as u64
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            url: default_url(),
            user_id: default_user_id(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfig {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconnectConfig {
    /// Build the reconnect policy described by these settings.
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.max_attempts,
        )
    }
}

impl SessionConfig {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default file if it exists, else the
    /// built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Location of the per-user configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Check that the configuration can produce a connection target.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Config("user_id must not be empty".to_string()));
        }
        if self.reconnect.max_delay_ms < self.reconnect.base_delay_ms {
            return Err(Error::Config(format!(
                "reconnect.max_delay_ms ({}) is below reconnect.base_delay_ms ({})",
                self.reconnect.max_delay_ms, self.reconnect.base_delay_ms
            )));
        }
        self.endpoint().map(|_| ())
    }

    /// The connection target: the configured URL with `user_id` set as a
    /// query parameter. Other query parameters are preserved.
    pub fn endpoint(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::UnsupportedScheme(url.scheme().to_string()));
        }

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "user_id")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &retained {
                query.append_pair(key, value);
            }
            query.append_pair("user_id", &self.user_id);
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
