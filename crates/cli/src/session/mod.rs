// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Chat session layer.
//!
//! Keeps one persistent WebSocket connection to the conversational service
//! and turns its frames into an ordered message history.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────┐
//! │SessionHandle │────►│  Controller  │────►│  Connection  │────►│Transport │
//! │   (clone)    │◄────│(store, ids)  │◄────│   Manager    │◄────│ (trait)  │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────┘
//!                                                  │
//!                                                  ▼
//!                                           ┌──────────────┐
//!                                           │  Scheduler   │  (retry timers)
//!                                           └──────────────┘
//! ```
//!
//! # Features
//!
//! - Optimistic append of user messages
//! - Automatic reconnect with capped exponential backoff
//! - Broadcast and watch notifications for presentation layers
//! - Injectable connector and scheduler for testing

mod connection;
mod controller;
mod runner;
mod scheduler;
mod transport;

pub use connection::{ConnectionManager, ConnectionUpdate};
pub use controller::{SessionController, SessionError, SessionEvent, SessionResult};
pub use runner::{Session, SessionHandle};
pub use scheduler::{Delay, Scheduler, TokioScheduler};
pub use transport::{
    Connector, Transport, TransportError, TransportFuture, TransportResult, WebSocketConnector,
    WebSocketTransport,
};

#[cfg(test)]
pub(crate) mod test_helpers;
