//! AccessStateMachine - Owner of the shared access state.
//!
//! All writes go through the watch sender, so transitions are serialized
//! and every subscriber sees them without polling. Ordinary setters obey
//! the `AccessState` transition table; only `refresh` may move a
//! subscribed user back to not-subscribed, and only when the entitlement
//! store says so. Each such expiry also bumps a counter, so observers
//! cannot miss one even when later state changes coalesce with it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::access::{AccessState, GateError};
use crate::domain::foundation::StateMachine;
use crate::ports::EntitlementStore;

pub struct AccessStateMachine {
    store: Arc<dyn EntitlementStore>,
    state: watch::Sender<AccessState>,
    expirations: watch::Sender<u64>,
}

impl AccessStateMachine {
    /// Creates a machine in the `Unknown` state.
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self::with_state(store, AccessState::Unknown)
    }

    /// Creates a machine with a known starting state (e.g. a cached value).
    pub fn with_state(store: Arc<dyn EntitlementStore>, initial: AccessState) -> Self {
        let (state, _rx) = watch::channel(initial);
        let (expirations, _rx) = watch::channel(0);
        Self {
            store,
            state,
            expirations,
        }
    }

    pub fn current(&self) -> AccessState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AccessState> {
        self.state.subscribe()
    }

    /// Receiver notified each time a refresh observes an expiry.
    pub fn subscribe_expirations(&self) -> watch::Receiver<u64> {
        self.expirations.subscribe()
    }

    /// Marks the user subscribed. Returns true if the state changed.
    pub fn set_subscribed(&self) -> bool {
        self.transition(AccessState::Subscribed)
    }

    /// Marks the user not subscribed. Returns true if the state changed.
    ///
    /// Refused while subscribed; use `refresh` to observe an expiry.
    pub fn set_not_subscribed(&self) -> bool {
        self.transition(AccessState::NotSubscribed)
    }

    /// Re-reads entitlement from the store and adopts its answer.
    ///
    /// On failure the last known state is kept.
    pub async fn refresh(&self) -> Result<AccessState, GateError> {
        let entitled = match self.store.refresh().await {
            Ok(entitled) => entitled,
            Err(e) => {
                tracing::warn!(error = %e, state = ?self.current(), "Entitlement refresh failed, keeping last known state");
                return Err(GateError::refresh_failed(e.to_string()));
            }
        };

        let target = AccessState::from_entitlement(entitled);
        let mut previous = target;
        self.state.send_if_modified(|current| {
            previous = *current;
            if *current == target {
                return false;
            }
            *current = target;
            true
        });

        if previous != target {
            if previous.is_subscribed() {
                tracing::info!("Subscription no longer active");
                self.expirations.send_modify(|count| *count += 1);
            }
            tracing::info!(from = ?previous, to = ?target, "Access state refreshed");
        }
        Ok(target)
    }

    fn transition(&self, target: AccessState) -> bool {
        self.state.send_if_modified(|current| {
            if *current == target {
                return false;
            }
            let from = *current;
            match from.transition_to(target) {
                Ok(next) => {
                    tracing::info!(from = ?from, to = ?next, "Access state changed");
                    *current = next;
                    true
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Access state transition refused");
                    false
                }
            }
        })
    }
}
