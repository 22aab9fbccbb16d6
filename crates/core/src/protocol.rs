// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket frames exchanged with the conversational service.
//!
//! The protocol is simple:
//! - Client sends `{"message": text}` for every user turn
//! - Server sends one JSON object per reply or system notice
//!
//! Inbound frames are decoded field by field rather than through a derived
//! `Deserialize`, so that `null` counts as absent, unknown keys are ignored,
//! and a documented key holding the wrong JSON type rejects the whole frame.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::message::{Message, MessageId, MessageMetadata, Origin};

/// A decoded frame received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub origin: Origin,
    pub text: String,
    /// Peer-supplied timestamp, if any.
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: MessageMetadata,
}

impl InboundFrame {
    /// Decodes a frame from raw JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(fields) => Self::from_fields(&fields),
            other => Err(Error::NotAnObject(json_kind(&other))),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        let origin = optional_str(fields, "type")?.map_or(Origin::Assistant, Origin::from_wire);
        let text = optional_str(fields, "message")?.unwrap_or_default().to_string();
        let timestamp = optional_str(fields, "timestamp")?.map(parse_timestamp).transpose()?;
        let metadata = MessageMetadata {
            intent: optional_str(fields, "intent")?.map(str::to_string),
            workflow_active: optional_bool(fields, "workflow_active")?,
            completed: optional_bool(fields, "completed")?,
            context_switched: optional_bool(fields, "context_switched")?,
        };
        Ok(InboundFrame { origin, text, timestamp, metadata })
    }

    /// Converts the frame into a stored message.
    ///
    /// `received_at` is used when the peer sent no timestamp.
    pub fn into_message(self, id: MessageId, received_at: DateTime<Utc>) -> Message {
        let timestamp = self.timestamp.unwrap_or(received_at);
        Message::inbound(id, self.origin, self.text, timestamp, self.metadata)
    }
}

/// A frame sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub message: String,
}

impl OutboundFrame {
    pub fn new(message: impl Into<String>) -> Self {
        OutboundFrame { message: message.into() }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the frame from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Parses an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, or a naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::InvalidTimestamp(raw.to_string()))
}

fn optional_str<'a>(fields: &'a Map<String, Value>, field: &'static str) -> Result<Option<&'a str>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(Error::InvalidField { field, expected: "string" }),
    }
}

fn optional_bool(fields: &Map<String, Value>, field: &'static str) -> Result<Option<bool>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::InvalidField { field, expected: "boolean" }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
