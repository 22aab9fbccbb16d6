// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conversation messages.
//!
//! A [`Message`] is one turn in the conversation. Ids are always generated
//! locally from the creation time and a per-session sequence:
//!
//! Format: `{created_ms}-{seq}`

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
    System,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Assistant => "assistant",
            Origin::System => "system",
        }
    }

    /// Maps an inbound `type` value to an origin.
    ///
    /// Anything unrecognized is treated as the assistant speaking.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "user" => Origin::User,
            "system" => Origin::System,
            _ => Origin::Assistant,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque message identifier, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(created_ms: i64, seq: u64) -> Self {
        MessageId(format!("{created_ms}-{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates message ids for a single session.
///
/// The sequence alone guarantees uniqueness; the timestamp prefix only makes
/// ids readable in logs.
#[derive(Debug, Default)]
pub struct MessageIds {
    seq: u64,
}

impl MessageIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id for a message created at `at`.
    pub fn next_id(&mut self, at: DateTime<Utc>) -> MessageId {
        self.seq += 1;
        MessageId::new(at.timestamp_millis(), self.seq)
    }
}

/// Workflow hints the assistant attaches to its replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_switched: Option<bool>,
}

impl MessageMetadata {
    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.workflow_active.is_none()
            && self.completed.is_none()
            && self.context_switched.is_none()
    }
}

/// One turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub origin: Origin,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Only ever set on assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    /// Creates a message typed by the local user.
    pub fn user(id: MessageId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Message { id, origin: Origin::User, text: text.into(), timestamp, metadata: None }
    }

    /// Creates a message received from the remote service.
    ///
    /// Metadata is kept only for assistant messages that carry at least one
    /// field.
    pub fn inbound(
        id: MessageId,
        origin: Origin,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        metadata: MessageMetadata,
    ) -> Self {
        let metadata = (origin == Origin::Assistant && !metadata.is_empty()).then_some(metadata);
        Message { id, origin, text: text.into(), timestamp, metadata }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
