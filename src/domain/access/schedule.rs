//! Bounded poll schedule for reconciliation.

use std::time::Duration;

/// Delay table for the reconciliation poll.
///
/// The first `fast_attempts` polls wait `fast_delay`, the remaining ones up
/// to `max_attempts` wait `slow_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub fast_delay: Duration,
    pub slow_delay: Duration,
    pub fast_attempts: u32,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            fast_delay: Duration::from_millis(300),
            slow_delay: Duration::from_millis(600),
            fast_attempts: 3,
            max_attempts: 6,
        }
    }
}

impl PollSchedule {
    /// Delay after the given 1-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= self.fast_attempts {
            self.fast_delay
        } else {
            self.slow_delay
        }
    }

    /// Worst-case time spent polling.
    pub fn total_wait(&self) -> Duration {
        (1..=self.max_attempts).map(|a| self.delay_for(a)).sum()
    }
}
