// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session controller.
//!
//! Provides the command surface presentation code talks to:
//! - Sending user messages (optimistic append, then transmit)
//! - Decoding inbound frames into the message history
//! - Clearing the history
//! - Explicit reconnect and disconnect
//!
//! Every state change and store mutation is published synchronously, as a
//! [`SessionEvent`] on a broadcast channel and as the latest value on watch
//! channels.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::warn;

use banter_core::{
    ClockSource, ConnectionState, ConnectionStatus, InboundFrame, Message, MessageId, MessageIds,
    MessageSnapshot, MessageStore, OutboundFrame, SystemClock,
};

use super::connection::{ConnectionManager, ConnectionUpdate};
use super::scheduler::{Scheduler, TokioScheduler};
use super::transport::Connector;
use crate::config::SessionConfig;

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 256;

/// Error type for session commands.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Sending requires a live connection.
    #[error("not connected (connection is {state})\n  hint: wait for the connection or use /reconnect")]
    NotConnected { state: ConnectionState },

    /// The message has no visible content.
    #[error("message is empty")]
    EmptyMessage,

    /// The session task has stopped.
    #[error("session closed")]
    SessionClosed,
}

/// Result type for session commands.
pub type SessionResult<T> = Result<T, SessionError>;

/// Change notifications published by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StatusChanged(ConnectionStatus),
    MessageAppended(Message),
    MessagesCleared,
}

/// Outbound side of the change notification channels.
struct Notifier {
    events: broadcast::Sender<SessionEvent>,
    status: watch::Sender<ConnectionStatus>,
    /// The history itself. Appends mutate it in place, readers copy out a
    /// snapshot on demand.
    messages: watch::Sender<MessageStore>,
}

impl Notifier {
    fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (status, _) = watch::channel(ConnectionStatus::default());
        let (messages, _) = watch::channel(MessageStore::new());
        Notifier { events, status, messages }
    }

    fn status_changed(&self, status: ConnectionStatus) {
        self.status.send_replace(status);
        // No subscribers is fine
        let _ = self.events.send(SessionEvent::StatusChanged(status));
    }

    fn store_changed(&self, change: impl FnOnce(&mut MessageStore), event: SessionEvent) {
        self.messages.send_modify(change);
        let _ = self.events.send(event);
    }

    fn snapshot(&self) -> MessageSnapshot {
        self.messages.borrow().snapshot()
    }
}

/// Owns the connection manager and the message store of one session.
pub struct SessionController<C: Connector, S: Scheduler = TokioScheduler> {
    user_id: String,
    manager: ConnectionManager<C, S>,
    ids: MessageIds,
    clock: Arc<dyn ClockSource>,
    notifier: Notifier,
}

impl<C: Connector> SessionController<C> {
    /// Create a controller for the configured endpoint.
    pub fn new(config: &SessionConfig, connector: C) -> crate::Result<Self> {
        let endpoint = config.endpoint()?;
        let manager = ConnectionManager::new(endpoint.as_str(), connector, config.reconnect.policy());
        Ok(Self::with_parts(manager, config.user_id.clone(), Arc::new(SystemClock)))
    }
}

impl<C: Connector, S: Scheduler> SessionController<C, S> {
    /// Create a controller from an existing manager and clock.
    pub fn with_parts(
        manager: ConnectionManager<C, S>,
        user_id: impl Into<String>,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        SessionController {
            user_id: user_id.into(),
            manager,
            ids: MessageIds::new(),
            clock,
            notifier: Notifier::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn endpoint(&self) -> &str {
        self.manager.endpoint()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.manager.status()
    }

    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// Snapshot of the message history.
    pub fn messages(&self) -> MessageSnapshot {
        self.notifier.snapshot()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.notifier.events.subscribe()
    }

    /// Watch the latest connection status.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.notifier.status.subscribe()
    }

    /// Watch the message history.
    pub fn watch_messages(&self) -> watch::Receiver<MessageStore> {
        self.notifier.messages.subscribe()
    }

    /// Send a user message.
    ///
    /// The message is appended to the history before it is transmitted and
    /// stays there even if transmission fails.
    pub async fn send_message(&mut self, text: &str) -> SessionResult<MessageId> {
        let state = self.manager.state();
        if !state.accepts_input() {
            warn!(%state, "message not sent: not connected");
            return Err(SessionError::NotConnected { state });
        }
        if text.trim().is_empty() {
            warn!("message not sent: text is blank");
            return Err(SessionError::EmptyMessage);
        }

        let now = self.clock.now();
        let id = self.ids.next_id(now);
        self.append(Message::user(id.clone(), text, now));

        match OutboundFrame::new(text).to_json() {
            Ok(frame) => {
                if let Err(e) = self.manager.send(frame).await {
                    warn!(message_id = %id, error = %e, "transmission failed");
                }
            }
            Err(e) => warn!(message_id = %id, error = %e, "failed to encode outbound frame"),
        }
        Ok(id)
    }

    /// Decode an inbound payload and append it to the history.
    ///
    /// Malformed payloads are dropped with a diagnostic; nothing else changes.
    pub fn on_inbound_payload(&mut self, raw: &str) -> Option<MessageId> {
        let frame = match InboundFrame::from_json(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, payload_len = raw.len(), "dropping malformed payload");
                return None;
            }
        };
        let received_at = self.clock.now();
        let id = self.ids.next_id(received_at);
        self.append(frame.into_message(id.clone(), received_at));
        Some(id)
    }

    /// Empty the message history. The connection is untouched.
    pub fn clear_messages(&mut self) {
        self.notifier.store_changed(MessageStore::clear, SessionEvent::MessagesCleared);
    }

    pub fn connect(&mut self) {
        self.manager.connect();
        self.publish_status();
    }

    pub async fn disconnect(&mut self) {
        self.manager.disconnect().await;
        self.publish_status();
    }

    pub async fn reconnect(&mut self) {
        self.manager.reconnect().await;
        self.publish_status();
    }

    /// Wait for one connection update and apply it. Cancel-safe.
    pub async fn process_next(&mut self) {
        match self.manager.next_event().await {
            ConnectionUpdate::Status(status) => self.notifier.status_changed(status),
            ConnectionUpdate::Payload(raw) => {
                self.on_inbound_payload(&raw);
            }
        }
    }

    fn append(&mut self, message: Message) {
        let event = SessionEvent::MessageAppended(message.clone());
        self.notifier.store_changed(|store| store.append(message), event);
    }

    fn publish_status(&mut self) {
        for status in self.manager.drain_updates() {
            self.notifier.status_changed(status);
        }
    }
}
