// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle management.
//!
//! The [`ConnectionManager`] drives the pure state machine in
//! [`banter_core::state`] and executes its effects. It owns the transport
//! handle, the in-flight connection attempt, and the pending retry timer, so
//! each of them is reachable from exactly one place and a single `take()`
//! cancels or releases it.
//!
//! [`ConnectionManager::next_event`] is cancel-safe: the connect future and
//! the retry timer live in the manager rather than on the caller's stack, and
//! state only changes after one of them has completed.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use banter_core::state::{transition, ConnectionEvent, ConnectionState, ConnectionStatus, Effect};
use banter_core::ReconnectPolicy;

use super::scheduler::{Delay, Scheduler, TokioScheduler};
use super::transport::{Connector, Transport, TransportError, TransportFuture, TransportResult};

/// Updates yielded by [`ConnectionManager::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUpdate {
    /// The connection status changed.
    Status(ConnectionStatus),
    /// A raw inbound text frame, exactly as delivered.
    Payload(String),
}

/// A retry timer together with the attempt it was scheduled for.
struct PendingRetry {
    attempt: u32,
    timer: Delay,
}

/// Owns the single logical connection of a session.
pub struct ConnectionManager<C: Connector, S: Scheduler = TokioScheduler> {
    /// Fully built endpoint URL.
    endpoint: String,
    connector: C,
    scheduler: S,
    policy: ReconnectPolicy,
    state: ConnectionState,
    /// Set when the policy refused a further automatic retry.
    retries_exhausted: bool,
    /// The live transport, present only while connected.
    transport: Option<C::Transport>,
    /// The in-flight connection attempt, present only while connecting.
    connecting: Option<TransportFuture<'static, C::Transport>>,
    /// The pending retry timer, present only while disconnected.
    retry: Option<PendingRetry>,
    /// Status changes not yet handed out.
    updates: VecDeque<ConnectionStatus>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager that schedules retries on the tokio timer.
    pub fn new(endpoint: impl Into<String>, connector: C, policy: ReconnectPolicy) -> Self {
        Self::with_scheduler(endpoint, connector, TokioScheduler, policy)
    }
}

impl<C: Connector, S: Scheduler> ConnectionManager<C, S> {
    /// Create a manager with a custom retry scheduler.
    pub fn with_scheduler(
        endpoint: impl Into<String>,
        connector: C,
        scheduler: S,
        policy: ReconnectPolicy,
    ) -> Self {
        ConnectionManager {
            endpoint: endpoint.into(),
            connector,
            scheduler,
            policy,
            state: ConnectionState::Idle,
            retries_exhausted: false,
            transport: None,
            connecting: None,
            retry: None,
            updates: VecDeque::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reconnect attempts claimed since the last successful connection.
    pub fn attempt(&self) -> u32 {
        self.policy.attempt()
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            state: self.state,
            attempt: self.policy.attempt(),
            retries_exhausted: self.retries_exhausted,
        }
    }

    /// Check if a live transport is available for sending.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
            && self.transport.as_ref().is_some_and(|t| t.is_connected())
    }

    /// Check if a retry timer is pending.
    pub fn has_pending_retry(&self) -> bool {
        self.retry.is_some()
    }

    /// Drain status changes produced by the last command.
    pub fn drain_updates(&mut self) -> impl Iterator<Item = ConnectionStatus> + '_ {
        self.updates.drain(..)
    }

    /// Start connecting. No-op while connecting or connected.
    pub fn connect(&mut self) {
        self.apply(ConnectionEvent::Connect);
    }

    /// Cancel any pending retry and close the connection.
    ///
    /// Idempotent: disconnecting an idle manager changes nothing.
    pub async fn disconnect(&mut self) {
        if let Some(released) = self.apply(ConnectionEvent::Disconnect) {
            close_gracefully(released).await;
        }
    }

    /// Tear the connection down completely and start over with a fresh
    /// backoff schedule.
    pub async fn reconnect(&mut self) {
        self.disconnect().await;
        self.apply(ConnectionEvent::Reconnect);
    }

    /// Transmit an encoded frame on the live transport.
    pub async fn send(&mut self, frame: String) -> TransportResult<()> {
        if self.state != ConnectionState::Connected {
            return Err(TransportError::ConnectionClosed);
        }
        let transport = self.transport.as_mut().ok_or(TransportError::ConnectionClosed)?;
        transport.send(frame).await
    }

    /// Wait for the next status change or inbound frame.
    ///
    /// Pending forever while idle. Cancel-safe.
    pub async fn next_event(&mut self) -> ConnectionUpdate {
        loop {
            if let Some(status) = self.updates.pop_front() {
                return ConnectionUpdate::Status(status);
            }

            if let Some(connecting) = self.connecting.as_mut() {
                let result = connecting.await;
                self.connecting = None;
                self.on_connect_result(result);
                continue;
            }

            if let Some(transport) = self.transport.as_mut() {
                let received = transport.recv().await;
                match received {
                    Ok(Some(payload)) => return ConnectionUpdate::Payload(payload),
                    Ok(None) => {
                        info!(endpoint = %self.endpoint, "connection closed by peer");
                        self.transport = None;
                        self.apply(ConnectionEvent::Closed);
                    }
                    Err(e) => {
                        warn!(endpoint = %self.endpoint, error = %e, "transport failure");
                        self.transport = None;
                        self.apply(ConnectionEvent::Failed);
                        self.apply(ConnectionEvent::Closed);
                    }
                }
                continue;
            }

            if let Some(retry) = self.retry.as_mut() {
                retry.timer.as_mut().await;
                let attempt = retry.attempt;
                self.retry = None;
                debug!(attempt, "retry timer elapsed");
                self.apply(ConnectionEvent::RetryElapsed { attempt });
                continue;
            }

            std::future::pending::<()>().await;
        }
    }

    fn on_connect_result(&mut self, result: TransportResult<C::Transport>) {
        match result {
            Ok(transport) => {
                info!(endpoint = %self.endpoint, "connected");
                self.transport = Some(transport);
                self.apply(ConnectionEvent::Opened);
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "connection attempt failed");
                self.apply(ConnectionEvent::Failed);
                self.apply(ConnectionEvent::Closed);
            }
        }
    }

    /// Run one transition and execute its effects.
    ///
    /// Returns the released transport, if any, for the caller to close.
    fn apply(&mut self, event: ConnectionEvent) -> Option<C::Transport> {
        let previous = self.status();
        let step = transition(self.state, &mut self.policy, event);
        let mut released = None;

        for effect in step.effects {
            match effect {
                Effect::CancelRetry => {
                    if let Some(retry) = self.retry.take() {
                        debug!(attempt = retry.attempt, "cancelled pending retry");
                    }
                }
                Effect::ReleaseTransport => {
                    self.connecting = None;
                    released = self.transport.take();
                }
                Effect::OpenTransport => {
                    info!(endpoint = %self.endpoint, attempt = self.policy.attempt(), "connecting");
                    self.connecting = Some(self.connector.connect(&self.endpoint));
                }
                Effect::ScheduleRetry { delay, attempt } => {
                    info!(
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        "scheduling reconnect"
                    );
                    self.retry = Some(PendingRetry { attempt, timer: self.scheduler.delay(delay) });
                }
                Effect::RetriesExhausted { attempts } => {
                    warn!(attempts, "giving up on automatic reconnection");
                    self.retries_exhausted = true;
                }
            }
        }

        self.state = step.state;
        if self.state != ConnectionState::Disconnected {
            self.retries_exhausted = false;
        }

        let current = self.status();
        if current != previous {
            debug!(from = %previous.state, to = %current.state, event = ?event, "state changed");
            self.updates.push_back(current);
        }
        released
    }
}

async fn close_gracefully<T: Transport>(mut transport: T) {
    if let Err(e) = transport.close().await {
        debug!(error = %e, "close handshake failed");
    }
}
