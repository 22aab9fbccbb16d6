// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Property-based tests for the connection state machine.
//!
//! A small model executes the effects of every transition and checks the
//! resource invariants: at most one live transport handle, at most one
//! pending retry timer, and a bounded attempt counter.

use crate::policy::ReconnectPolicy;
use crate::state::{transition, ConnectionEvent, ConnectionState, Effect};
use proptest::prelude::*;

fn arb_event() -> impl Strategy<Value = ConnectionEvent> {
    prop_oneof![
        Just(ConnectionEvent::Connect),
        Just(ConnectionEvent::Opened),
        Just(ConnectionEvent::Closed),
        Just(ConnectionEvent::Failed),
        Just(ConnectionEvent::Disconnect),
        Just(ConnectionEvent::Reconnect),
        (0u32..7).prop_map(|attempt| ConnectionEvent::RetryElapsed { attempt }),
    ]
}

#[derive(Debug, Default)]
struct Resources {
    transport_live: bool,
    retry_pending: bool,
}

impl Resources {
    /// Executes `effects`, failing on any double acquisition.
    fn execute(&mut self, effects: &[Effect]) -> Result<(), TestCaseError> {
        for effect in effects {
            match effect {
                Effect::CancelRetry => self.retry_pending = false,
                Effect::ReleaseTransport => self.transport_live = false,
                Effect::OpenTransport => {
                    prop_assert!(!self.transport_live, "opened a second transport");
                    self.transport_live = true;
                }
                Effect::ScheduleRetry { .. } => {
                    prop_assert!(!self.retry_pending, "scheduled a second retry timer");
                    self.retry_pending = true;
                }
                Effect::RetriesExhausted { .. } => {}
            }
        }
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_resources_are_never_doubled(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut policy = ReconnectPolicy::default();
        let mut state = ConnectionState::Idle;
        let mut resources = Resources::default();

        for event in events {
            let fires_timer = matches!(
                (state, event),
                (ConnectionState::Disconnected, ConnectionEvent::RetryElapsed { attempt })
                    if attempt == policy.attempt()
            );
            if fires_timer {
                resources.retry_pending = false;
            }
            let t = transition(state, &mut policy, event);
            resources.execute(&t.effects)?;
            state = t.state;
        }
    }

    #[test]
    fn prop_attempt_never_exceeds_cap(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut policy = ReconnectPolicy::default();
        let mut state = ConnectionState::Idle;

        for event in events {
            let t = transition(state, &mut policy, event);
            state = t.state;
            prop_assert!(policy.attempt() <= policy.max_attempts());
            if state == ConnectionState::Connected {
                prop_assert_eq!(policy.attempt(), 0);
            }
        }
    }

    #[test]
    fn prop_scheduled_attempts_match_counter(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut policy = ReconnectPolicy::default();
        let mut state = ConnectionState::Idle;

        for event in events {
            let t = transition(state, &mut policy, event);
            for effect in &t.effects {
                if let Effect::ScheduleRetry { delay, attempt } = effect {
                    prop_assert_eq!(*attempt, policy.attempt());
                    prop_assert_eq!(*delay, policy.delay_for(*attempt));
                    prop_assert_eq!(t.state, ConnectionState::Disconnected);
                }
            }
            state = t.state;
        }
    }

    #[test]
    fn prop_disconnect_always_settles_idle(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut policy = ReconnectPolicy::default();
        let mut state = ConnectionState::Idle;
        for event in events {
            state = transition(state, &mut policy, event).state;
        }
        let t = transition(state, &mut policy, ConnectionEvent::Disconnect);
        prop_assert_eq!(t.state, ConnectionState::Idle);
        prop_assert!(t.effects.contains(&Effect::CancelRetry));
        prop_assert!(t.effects.contains(&Effect::ReleaseTransport));
    }
}
