// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for session module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use banter_core::{ConnectionState, ConnectionStatus, FixedClock, ReconnectPolicy};

use super::connection::{ConnectionManager, ConnectionUpdate};
use super::controller::SessionController;
use super::runner::{Session, SessionHandle};
use super::scheduler::{Delay, Scheduler};
use super::transport_tests::MockConnector;

pub type TestManager = ConnectionManager<MockConnector, RecordingScheduler>;
pub type TestController = SessionController<MockConnector, RecordingScheduler>;

pub const ENDPOINT: &str = "ws://localhost:8000/ws?user_id=user_demo1";

/// Upper bound for anything a test expects to happen.
const PATIENCE: Duration = Duration::from_secs(5);

/// How long a test waits before concluding nothing happens.
const QUIET: Duration = Duration::from_millis(50);

/// Scheduler that records every requested delay.
///
/// Timers either fire immediately or never, and the number of timers still
/// alive is tracked so tests can check cancellation.
#[derive(Clone)]
pub struct RecordingScheduler {
    delays: Arc<Mutex<Vec<Duration>>>,
    live: Arc<AtomicUsize>,
    hold: bool,
}

impl RecordingScheduler {
    /// Timers complete as soon as they are polled.
    pub fn immediate() -> Self {
        Self::build(false)
    }

    /// Timers never complete.
    pub fn holding() -> Self {
        Self::build(true)
    }

    fn build(hold: bool) -> Self {
        RecordingScheduler {
            delays: Arc::new(Mutex::new(Vec::new())),
            live: Arc::new(AtomicUsize::new(0)),
            hold,
        }
    }

    pub fn delays_ms(&self) -> Vec<u128> {
        self.delays.lock().unwrap().iter().map(Duration::as_millis).collect()
    }

    /// Timers created and not yet dropped.
    pub fn live_timers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Scheduler for RecordingScheduler {
    fn delay(&self, duration: Duration) -> Delay {
        self.delays.lock().unwrap().push(duration);
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::pin(RecordedTimer { live: Arc::clone(&self.live), hold: self.hold })
    }
}

struct RecordedTimer {
    live: Arc<AtomicUsize>,
    hold: bool,
}

impl Future for RecordedTimer {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.hold {
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

impl Drop for RecordedTimer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

pub fn test_manager(connector: &MockConnector, scheduler: &RecordingScheduler) -> TestManager {
    ConnectionManager::with_scheduler(
        ENDPOINT,
        connector.clone(),
        scheduler.clone(),
        ReconnectPolicy::default(),
    )
}

pub fn test_controller(connector: &MockConnector, scheduler: &RecordingScheduler) -> TestController {
    SessionController::with_parts(
        test_manager(connector, scheduler),
        "user_demo1",
        Arc::new(FixedClock(fixed_time())),
    )
}

/// Await the next manager update, failing if none arrives.
pub async fn next_update(manager: &mut TestManager) -> ConnectionUpdate {
    tokio::time::timeout(PATIENCE, manager.next_event()).await.expect("no connection update")
}

/// Assert the manager produces nothing more.
pub async fn assert_quiet(manager: &mut TestManager) {
    let update = tokio::time::timeout(QUIET, manager.next_event()).await;
    assert!(update.is_err(), "unexpected update: {:?}", update.unwrap());
}

/// Collect status updates until one matches `done`.
pub async fn statuses_until(
    manager: &mut TestManager,
    done: impl Fn(&ConnectionStatus) -> bool,
) -> Vec<ConnectionStatus> {
    let mut seen = Vec::new();
    loop {
        match next_update(manager).await {
            ConnectionUpdate::Status(status) => {
                seen.push(status);
                if done(&status) {
                    return seen;
                }
            }
            ConnectionUpdate::Payload(payload) => panic!("unexpected payload {payload}"),
        }
    }
}

/// Drive the manager until it reaches `state`.
pub async fn drive_to(manager: &mut TestManager, state: ConnectionState) -> Vec<ConnectionStatus> {
    statuses_until(manager, |s| s.state == state).await
}

/// Process controller updates until it reaches `state`.
pub async fn process_to(controller: &mut TestController, state: ConnectionState) {
    let reached = tokio::time::timeout(PATIENCE, async {
        while controller.state() != state {
            controller.process_next().await;
        }
    })
    .await;
    assert!(reached.is_ok(), "controller never reached {state}");
}

/// Process exactly one controller update.
pub async fn process_one(controller: &mut TestController) {
    tokio::time::timeout(PATIENCE, controller.process_next()).await.expect("no controller update");
}

/// A controller that has completed its first connection.
pub async fn connected_controller() -> (TestController, MockConnector) {
    let connector = MockConnector::new();
    let scheduler = RecordingScheduler::holding();
    let mut controller = test_controller(&connector, &scheduler);
    controller.connect();
    process_to(&mut controller, ConnectionState::Connected).await;
    (controller, connector)
}

pub fn states(statuses: &[ConnectionStatus]) -> Vec<ConnectionState> {
    statuses.iter().map(|s| s.state).collect()
}

/// A handle whose session task has already been dropped.
///
/// The session runs on a private runtime that is shut down once it has
/// connected. Call from a synchronous test.
pub fn orphaned_handle() -> SessionHandle {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let handle = runtime.block_on(async {
        let connector = MockConnector::new();
        let handle = Session::spawn_with(test_controller(&connector, &RecordingScheduler::holding()));
        tokio::time::timeout(PATIENCE, handle.wait_for_state(ConnectionState::Connected))
            .await
            .expect("session never connected")
            .unwrap();
        handle
    });
    drop(runtime);
    handle
}
