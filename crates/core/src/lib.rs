// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! banter-core: Session primitives for the banter chat client
//!
//! This crate provides the pure, synchronous building blocks of a chat
//! session: the message model, wire frames, the reconnect policy, the message
//! store, and the connection state machine. It performs no I/O; the `banter`
//! crate drives these types from its async session layer.

pub mod clock;
pub mod error;
pub mod message;
pub mod policy;
pub mod protocol;
pub mod state;
pub mod store;

#[cfg(test)]
mod proptests;

pub use clock::{ClockSource, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use message::{Message, MessageId, MessageIds, MessageMetadata, Origin};
pub use policy::ReconnectPolicy;
pub use protocol::{InboundFrame, OutboundFrame};
pub use state::{transition, ConnectionEvent, ConnectionState, ConnectionStatus, Effect, Transition};
pub use store::{MessageSnapshot, MessageStore};
