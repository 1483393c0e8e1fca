//! ForegroundRefresher - Throttled entitlement refresh on app activation.
//!
//! Every return to the foreground asks for a refresh, but the entitlement
//! store is only consulted once per refresh interval. The attempt time is
//! recorded before the store is called, so a failed refresh is retried in
//! the next window rather than on the very next activation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::access_state_machine::AccessStateMachine;
use crate::domain::access::{AccessState, AttemptDecision, GateError, PresentationAttempt};
use crate::ports::Clock;

/// What a foreground refresh request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshDecision {
    /// The store was consulted; carries the resulting state.
    Refreshed(AccessState),
    /// Inside the refresh interval; the store was not called.
    Throttled { retry_in: Duration },
    /// The store was consulted and failed; state unchanged.
    Failed(GateError),
}

impl RefreshDecision {
    pub fn called_store(&self) -> bool {
        !matches!(self, RefreshDecision::Throttled { .. })
    }
}

pub struct ForegroundRefresher {
    access: Arc<AccessStateMachine>,
    clock: Arc<dyn Clock>,
    throttle: Mutex<PresentationAttempt>,
}

impl ForegroundRefresher {
    pub fn new(access: Arc<AccessStateMachine>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            access,
            clock,
            throttle: Mutex::new(PresentationAttempt::new(interval)),
        }
    }

    /// App became active.
    pub async fn on_became_active(&self) -> RefreshDecision {
        let decision = self.begin(false);
        if let AttemptDecision::Suppressed { retry_in } = decision {
            tracing::debug!(
                retry_in_ms = retry_in.as_millis() as u64,
                "Foreground refresh throttled"
            );
            return RefreshDecision::Throttled { retry_in };
        }
        self.refresh().await
    }

    /// Refreshes regardless of the interval and restarts it.
    pub async fn refresh_now(&self) -> RefreshDecision {
        self.begin(true);
        self.refresh().await
    }

    fn begin(&self, force: bool) -> AttemptDecision {
        self.throttle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .try_begin(self.clock.now(), force)
    }

    async fn refresh(&self) -> RefreshDecision {
        match self.access.refresh().await {
            Ok(state) => {
                tracing::debug!(state = ?state, "Foreground refresh complete");
                RefreshDecision::Refreshed(state)
            }
            Err(e) => RefreshDecision::Failed(e),
        }
    }
}
