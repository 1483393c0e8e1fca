//! Presentation attempt throttle.
//!
//! Each call site that can put a paywall on screen owns one of these.
//! Unforced attempts are spaced by at least `min_interval`; forced attempts
//! always go through and restart the interval.

use std::time::Duration;
use tokio::time::Instant;

/// Outcome of asking the throttle for permission to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDecision {
    /// Attempt may proceed and has been recorded.
    Allowed {
        /// True if the interval guard was bypassed.
        forced: bool,
    },
    /// Attempt suppressed; the next unforced attempt opens after `retry_in`.
    Suppressed { retry_in: Duration },
}

impl AttemptDecision {
    /// Returns true if the attempt may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AttemptDecision::Allowed { .. })
    }
}

/// Last-attempt bookkeeping for one presentation call site.
#[derive(Debug, Clone)]
pub struct PresentationAttempt {
    min_interval: Duration,
    last_attempt: Option<Instant>,
}

impl PresentationAttempt {
    /// Creates a throttle that has never attempted.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_attempt: None,
        }
    }

    /// Minimum spacing between unforced attempts.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the last permitted attempt happened, if ever.
    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    /// Time left before an unforced attempt is permitted, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_attempt?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.min_interval {
            None
        } else {
            Some(self.min_interval - elapsed)
        }
    }

    /// Checks the guard and records the attempt when permitted.
    pub fn try_begin(&mut self, now: Instant, force: bool) -> AttemptDecision {
        if !force {
            if let Some(retry_in) = self.remaining(now) {
                return AttemptDecision::Suppressed { retry_in };
            }
        }
        self.last_attempt = Some(now);
        AttemptDecision::Allowed { forced: force }
    }
}
