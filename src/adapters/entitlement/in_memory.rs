//! In-memory entitlement store for testing and development.
//!
//! Supports:
//! - Setting the backend's entitlement answer
//! - Error injection (next call or every call)
//! - Simulated latency
//! - Call counting

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{EntitlementError, EntitlementStore};

/// Entitlement store whose backend answer is set by the test.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryEntitlementStore::new();
/// store.set_entitled(true);
/// store.fail_next(EntitlementError::Offline);
/// assert!(store.refresh().await.is_err());
/// assert!(store.refresh().await.unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitlementStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// What the backend would answer right now.
    backend_entitled: bool,
    /// Last value returned by a successful refresh.
    cached_entitled: bool,
    /// Errors to return on upcoming calls, in order.
    queued_errors: VecDeque<EntitlementError>,
    /// Error returned on every call while set.
    persistent_error: Option<EntitlementError>,
    /// Delay applied before answering.
    latency: Duration,
    /// Number of refresh calls received.
    refresh_calls: usize,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose backend already reports an active subscription.
    pub fn entitled() -> Self {
        let store = Self::new();
        store.set_entitled(true);
        store
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Sets what the backend answers on the next refresh.
    pub fn set_entitled(&self, entitled: bool) {
        self.inner.lock().unwrap().backend_entitled = entitled;
    }

    /// Fails the next refresh with `error`.
    pub fn fail_next(&self, error: EntitlementError) {
        self.inner.lock().unwrap().queued_errors.push_back(error);
    }

    /// Fails every refresh with `error` until cleared.
    pub fn fail_always(&self, error: EntitlementError) {
        self.inner.lock().unwrap().persistent_error = Some(error);
    }

    /// Stops failing refreshes.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.queued_errors.clear();
        state.persistent_error = None;
    }

    /// Delays every refresh answer.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().unwrap().latency = latency;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn refresh_calls(&self) -> usize {
        self.inner.lock().unwrap().refresh_calls
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn refresh(&self) -> Result<bool, EntitlementError> {
        let latency = {
            let mut state = self.inner.lock().unwrap();
            state.refresh_calls += 1;
            state.latency
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.queued_errors.pop_front() {
            return Err(error);
        }
        if let Some(error) = state.persistent_error.clone() {
            return Err(error);
        }
        state.cached_entitled = state.backend_entitled;
        Ok(state.cached_entitled)
    }

    fn is_entitled(&self) -> bool {
        self.inner.lock().unwrap().cached_entitled
    }
}
