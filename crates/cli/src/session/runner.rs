// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session task and its handle.
//!
//! A [`Session`] runs on a single tokio task that owns the
//! [`SessionController`]. Commands from any number of [`SessionHandle`]s and
//! connection updates are processed one at a time, so handlers never
//! interleave. When the last handle is dropped the task disconnects and
//! exits.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::info;

use banter_core::{ConnectionState, ConnectionStatus, MessageId, MessageSnapshot, MessageStore};

use super::controller::{SessionController, SessionError, SessionEvent, SessionResult};
use super::scheduler::Scheduler;
use super::transport::{Connector, WebSocketConnector};
use crate::config::SessionConfig;

/// Capacity of the command channel.
const COMMAND_CAPACITY: usize = 32;

/// Commands forwarded from handles to the session task.
enum SessionCommand {
    Send { text: String, reply: oneshot::Sender<SessionResult<MessageId>> },
    Clear { reply: oneshot::Sender<()> },
    Reconnect { reply: oneshot::Sender<()> },
    Disconnect { reply: oneshot::Sender<()> },
}

/// Entry point for starting sessions.
pub struct Session;

impl Session {
    /// Start a WebSocket session for `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &SessionConfig) -> crate::Result<SessionHandle> {
        let controller = SessionController::new(config, WebSocketConnector)?;
        Ok(Self::spawn_with(controller))
    }

    /// Start a session around an existing controller.
    pub fn spawn_with<C, S>(controller: SessionController<C, S>) -> SessionHandle
    where
        C: Connector + 'static,
        S: Scheduler + 'static,
    {
        let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
        let handle = SessionHandle {
            commands,
            status: controller.watch_status(),
            messages: controller.watch_messages(),
            events: controller.subscribe(),
        };
        tokio::spawn(run(controller, receiver));
        handle
    }
}

async fn run<C, S>(mut controller: SessionController<C, S>, mut commands: mpsc::Receiver<SessionCommand>)
where
    C: Connector,
    S: Scheduler,
{
    info!(endpoint = controller.endpoint(), user_id = controller.user_id(), "session started");
    controller.connect();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle_command(&mut controller, command).await,
                None => break,
            },
            () = controller.process_next() => {}
        }
    }

    controller.disconnect().await;
    info!("session stopped");
}

async fn handle_command<C: Connector, S: Scheduler>(
    controller: &mut SessionController<C, S>,
    command: SessionCommand,
) {
    // A dropped reply receiver only means the caller stopped waiting
    match command {
        SessionCommand::Send { text, reply } => {
            let result = controller.send_message(&text).await;
            let _ = reply.send(result);
        }
        SessionCommand::Clear { reply } => {
            controller.clear_messages();
            let _ = reply.send(());
        }
        SessionCommand::Reconnect { reply } => {
            controller.reconnect().await;
            let _ = reply.send(());
        }
        SessionCommand::Disconnect { reply } => {
            controller.disconnect().await;
            let _ = reply.send(());
        }
    }
}

/// Cloneable handle to a running session.
///
/// Only the session task holds senders, so every channel a handle reads
/// from closes once the task stops.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    status: watch::Receiver<ConnectionStatus>,
    messages: watch::Receiver<MessageStore>,
    /// Never read; kept only to open new subscriptions.
    events: broadcast::Receiver<SessionEvent>,
}

impl Clone for SessionHandle {
    fn clone(&self) -> Self {
        SessionHandle {
            commands: self.commands.clone(),
            status: self.status.clone(),
            messages: self.messages.clone(),
            events: self.events.resubscribe(),
        }
    }
}

impl SessionHandle {
    /// Send a user message. See [`SessionController::send_message`].
    pub async fn send_message(&self, text: impl Into<String>) -> SessionResult<MessageId> {
        let (reply, response) = oneshot::channel();
        self.submit(SessionCommand::Send { text: text.into(), reply }).await?;
        response.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub async fn clear_messages(&self) -> SessionResult<()> {
        self.request(|reply| SessionCommand::Clear { reply }).await
    }

    pub async fn reconnect(&self) -> SessionResult<()> {
        self.request(|reply| SessionCommand::Reconnect { reply }).await
    }

    pub async fn disconnect(&self) -> SessionResult<()> {
        self.request(|reply| SessionCommand::Disconnect { reply }).await
    }

    /// Latest message snapshot.
    pub fn messages(&self) -> MessageSnapshot {
        self.messages.borrow().snapshot()
    }

    /// Latest connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn state(&self) -> ConnectionState {
        self.status().state
    }

    /// Subscribe to every change notification from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.resubscribe()
    }

    /// Wait until the connection reaches `state`.
    ///
    /// Observes the latest status only; a state that is entered and left
    /// between two polls can be missed. Use [`subscribe`](Self::subscribe) to
    /// see every transition.
    pub async fn wait_for_state(&self, state: ConnectionState) -> SessionResult<ConnectionStatus> {
        let mut status = self.status.clone();
        let reached = status.wait_for(|s| s.state == state).await;
        reached.map(|s| *s).map_err(|_| SessionError::SessionClosed)
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<()>) -> SessionCommand,
    ) -> SessionResult<()> {
        let (reply, response) = oneshot::channel();
        self.submit(command(reply)).await?;
        response.await.map_err(|_| SessionError::SessionClosed)
    }

    async fn submit(&self, command: SessionCommand) -> SessionResult<()> {
        self.commands.send(command).await.map_err(|_| SessionError::SessionClosed)
    }
}
