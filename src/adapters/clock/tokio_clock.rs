//! Clock backed by tokio's timer.
//!
//! Under `tokio::time::pause` this clock follows the paused runtime clock,
//! which is how the time-dependent tests run without real delays.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

use crate::ports::Clock;

/// Production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
