//! Clock port - Time source and timer for throttles and backoff.
//!
//! Injected wherever the gate measures intervals or waits, so tests can
//! drive time without real delays.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Monotonic time source with delayed continuations.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}
