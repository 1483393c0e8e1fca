//! Reconciler - Resolves access after a paywall dismissal.
//!
//! The dismissal callback and the purchase delegate fire from independent
//! sources in no particular order, and the delegate can trail the
//! dismissal by seconds on a slow network. The reconciler bridges that gap
//! with a bounded poll:
//!
//! 1. Take a pending purchase signal immediately if there is one.
//! 2. Poll up to `max_attempts` times, checking the access state and the
//!    purchase signal, sleeping on the injected clock between polls.
//! 3. Check both once more, then give up with `ResolvedNotSubscribed`.
//!
//! A not-subscribed answer is not ground truth: a purchase can still land
//! after the deadline, which the foreground refresh picks up later.

use std::sync::Arc;

use tokio::sync::watch;

use super::access_state_machine::AccessStateMachine;
use super::shutdown;
use crate::domain::access::{FailureReason, PollSchedule, PurchaseSignal, ResolutionOutcome};
use crate::ports::Clock;

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub outcome: ResolutionOutcome,
    /// Number of poll delays that completed before resolution.
    pub polls: u32,
}

pub struct Reconciler {
    access: Arc<AccessStateMachine>,
    purchases: Arc<PurchaseSignal>,
    clock: Arc<dyn Clock>,
    schedule: PollSchedule,
}

impl Reconciler {
    pub fn new(
        access: Arc<AccessStateMachine>,
        purchases: Arc<PurchaseSignal>,
        clock: Arc<dyn Clock>,
        schedule: PollSchedule,
    ) -> Self {
        Self {
            access,
            purchases,
            clock,
            schedule,
        }
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    /// Runs the protocol once. Never fails; stops early on shutdown.
    pub async fn reconcile(&self, mut cancel: watch::Receiver<bool>) -> Reconciliation {
        if self.purchases.take() {
            tracing::info!(polls = 0, "Purchase signal already pending at dismissal");
            return Self::resolved(ResolutionOutcome::ResolvedSubscribed, 0);
        }

        let mut polls = 0;
        for attempt in 1..=self.schedule.max_attempts {
            if self.is_confirmed() {
                return Self::resolved(ResolutionOutcome::ResolvedSubscribed, polls);
            }
            if shutdown::is_requested(&cancel) {
                return Self::cancelled(polls);
            }

            let delay = self.schedule.delay_for(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Waiting for purchase confirmation");
            tokio::select! {
                _ = self.clock.sleep(delay) => polls += 1,
                _ = shutdown::requested(&mut cancel) => return Self::cancelled(polls),
            }
        }

        let outcome = if self.is_confirmed() {
            ResolutionOutcome::ResolvedSubscribed
        } else {
            ResolutionOutcome::ResolvedNotSubscribed
        };
        Self::resolved(outcome, polls)
    }

    /// Either source confirms. The signal is consumed even when the state
    /// alone already confirms, so no purchase outlives the resolution it
    /// belonged to.
    fn is_confirmed(&self) -> bool {
        let purchased = self.purchases.take();
        self.access.current().is_subscribed() || purchased
    }

    /// Drops a purchase signal left over from an earlier subscription.
    ///
    /// Returns true if one was pending.
    pub fn discard_pending_purchase(&self) -> bool {
        self.purchases.take()
    }

    fn resolved(outcome: ResolutionOutcome, polls: u32) -> Reconciliation {
        tracing::info!(?outcome, polls, "Reconciliation finished");
        Reconciliation { outcome, polls }
    }

    fn cancelled(polls: u32) -> Reconciliation {
        tracing::debug!(polls, "Reconciliation cancelled");
        Reconciliation {
            outcome: ResolutionOutcome::Failed(FailureReason::Cancelled),
            polls,
        }
    }
}
