// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect policy with capped exponential backoff.
//!
//! The delay before attempt `n` (1-based) is `min(base * 2^n, max)`. With the
//! defaults the schedule is 2s, 4s, 8s, 16s, 30s, after which automatic
//! reconnection stops.

use std::time::Duration;

/// Default base delay between reconnect attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);

/// Default ceiling for a single reconnect delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Default number of automatic reconnect attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Tracks consecutive reconnect attempts and computes their delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl ReconnectPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        ReconnectPolicy { base_delay, max_delay, max_attempts, attempt: 0 }
    }

    /// Delay before attempt `attempt`, saturating at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Claims the next attempt and returns its delay.
    ///
    /// Returns `None` once `max_attempts` have been claimed; the counter is
    /// left unchanged in that case.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt += 1;
        Some(self.delay_for(self.attempt))
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of attempts claimed since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
