// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry timers.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A pending timer. Dropping it cancels the timer.
pub type Delay = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Source of retry timers.
///
/// Injected into the connection manager so tests can observe scheduled
/// delays without waiting on the wall clock.
pub trait Scheduler: Send + Sync {
    /// Returns a future that completes after `duration`.
    fn delay(&self, duration: Duration) -> Delay;
}

/// Scheduler backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn delay(&self, duration: Duration) -> Delay {
        Box::pin(tokio::time::sleep(duration))
    }
}
