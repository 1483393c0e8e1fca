//! Reconciliation poll configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::access::PollSchedule;

/// Upper bound on poll attempts, keeping the wait after a dismissal short.
const MAX_ATTEMPTS_LIMIT: u32 = 20;

/// Bounded poll settings used after a paywall dismissal
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReconciliationConfig {
    /// Delay after each of the first `fast_attempts` polls
    #[serde(default = "default_fast_delay_ms")]
    pub fast_delay_ms: u64,

    /// Delay after each remaining poll
    #[serde(default = "default_slow_delay_ms")]
    pub slow_delay_ms: u64,

    #[serde(default = "default_fast_attempts")]
    pub fast_attempts: u32,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_fast_delay_ms() -> u64 {
    300
}

fn default_slow_delay_ms() -> u64 {
    600
}

fn default_fast_attempts() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    6
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            fast_delay_ms: default_fast_delay_ms(),
            slow_delay_ms: default_slow_delay_ms(),
            fast_attempts: default_fast_attempts(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconciliationConfig {
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            fast_delay: Duration::from_millis(self.fast_delay_ms),
            slow_delay: Duration::from_millis(self.slow_delay_ms),
            fast_attempts: self.fast_attempts,
            max_attempts: self.max_attempts,
        }
    }

    /// Validate reconciliation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fast_delay_ms == 0 {
            return Err(ValidationError::ZeroDuration("reconciliation.fast_delay_ms"));
        }
        if self.slow_delay_ms == 0 {
            return Err(ValidationError::ZeroDuration("reconciliation.slow_delay_ms"));
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ValidationError::MaxAttemptsOutOfRange {
                limit: MAX_ATTEMPTS_LIMIT,
                actual: self.max_attempts,
            });
        }
        if self.fast_attempts > self.max_attempts {
            return Err(ValidationError::FastAttemptsExceedMax {
                fast: self.fast_attempts,
                max: self.max_attempts,
            });
        }
        Ok(())
    }
}
