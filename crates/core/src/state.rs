// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection state machine.
//!
//! [`transition`] is pure: it maps the current state and an event to the next
//! state plus the effects the caller must execute, in order. The caller owns
//! the transport handle and the retry timer; the machine only says when to
//! open, release, schedule, or cancel them.
//!
//! ```text
//!   idle ──Connect──► connecting ──Opened──► connected
//!                       │    ▲                  │
//!                Closed │    │ RetryElapsed     │ Closed
//!                       ▼    │                  ▼
//!                    disconnected ◄─────────────┘
//! ```
//!
//! `Failed` moves a live connection to `error`, and `Closed` from `error`
//! takes the same backoff path. `Disconnect` returns to `idle` from anywhere.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policy::ReconnectPolicy;

/// Lifecycle state of the single session connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
        }
    }

    /// Human-readable status label.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "Idle",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Error => "Connection Error",
        }
    }

    /// Whether user input can be sent in this state.
    pub fn accepts_input(&self) -> bool {
        *self == ConnectionState::Connected
    }

    /// Placeholder shown in the input line.
    pub fn input_hint(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Type your message...",
            _ => "Disconnected - please reconnect",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What subscribers observe about the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Reconnect attempts claimed since the last successful connection.
    pub attempt: u32,
    /// Set while disconnected after the policy refused a further retry.
    pub retries_exhausted: bool,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Caller asked to connect.
    Connect,
    /// The transport finished its handshake.
    Opened,
    /// The transport closed, or failed to open.
    Closed,
    /// The transport reported an error.
    Failed,
    /// Caller asked to disconnect.
    Disconnect,
    /// Caller asked for a fresh connection with a reset backoff.
    Reconnect,
    /// The retry timer scheduled for `attempt` fired.
    RetryElapsed { attempt: u32 },
}

/// Side effects requested by a transition, executed in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    CancelRetry,
    ReleaseTransport,
    OpenTransport,
    ScheduleRetry { delay: Duration, attempt: u32 },
    RetriesExhausted { attempts: u32 },
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ConnectionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(state: ConnectionState) -> Self {
        Transition { state, effects: Vec::new() }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Computes the next state for `event`.
///
/// `policy` is advanced when a retry is scheduled and reset on `Opened` and
/// `Reconnect`.
pub fn transition(
    state: ConnectionState,
    policy: &mut ReconnectPolicy,
    event: ConnectionEvent,
) -> Transition {
    use ConnectionEvent as E;
    use ConnectionState as S;

    match (state, event) {
        (S::Idle | S::Disconnected | S::Error, E::Connect) => Transition::new(S::Connecting)
            .with_effects([Effect::CancelRetry, Effect::ReleaseTransport, Effect::OpenTransport]),

        (S::Connecting, E::Opened) => {
            policy.reset();
            Transition::new(S::Connected)
        }

        (S::Connecting | S::Connected | S::Error, E::Closed) => {
            let closed = Transition::new(S::Disconnected).with_effect(Effect::ReleaseTransport);
            match policy.next_delay() {
                Some(delay) => {
                    closed.with_effect(Effect::ScheduleRetry { delay, attempt: policy.attempt() })
                }
                None => closed.with_effect(Effect::RetriesExhausted { attempts: policy.attempt() }),
            }
        }

        (S::Connecting | S::Connected | S::Error, E::Failed) => Transition::new(S::Error),

        (_, E::Disconnect) => Transition::new(S::Idle)
            .with_effects([Effect::CancelRetry, Effect::ReleaseTransport]),

        (_, E::Reconnect) => {
            policy.reset();
            Transition::new(S::Connecting)
                .with_effects([Effect::CancelRetry, Effect::ReleaseTransport, Effect::OpenTransport])
        }

        (S::Disconnected, E::RetryElapsed { attempt }) if attempt == policy.attempt() => {
            Transition::new(S::Connecting).with_effect(Effect::OpenTransport)
        }

        (state, _) => Transition::new(state),
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
