//! Mock paywall service for testing.
//!
//! Plays back a scripted sequence of callbacks per presentation:
//! - Scripted user behaviour (present, purchase, dismiss, error, skip)
//! - Error injection on `present`
//! - Call tracking

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::access::{PaywallInfo, PaywallResult, PurchaseSignal, SkipReason};
use crate::ports::{PaywallError, PaywallHandler, PaywallService};

/// One step of a scripted paywall session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaywallStep {
    /// Wait before the next step.
    Wait(Duration),
    /// Report the paywall as visible.
    Present,
    /// Deliver a purchase completion through the purchase signal.
    Purchase,
    /// Close the paywall.
    Dismiss(PaywallResult),
    /// Fail the presentation.
    Error(String),
    /// Skip the presentation.
    Skip(SkipReason),
}

/// Mock paywall service.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaywallService::new().with_purchase_signal(signal.clone());
/// mock.push_script(vec![
///     PaywallStep::Present,
///     PaywallStep::Dismiss(PaywallResult::Purchased),
///     PaywallStep::Wait(Duration::from_millis(450)),
///     PaywallStep::Purchase,
/// ]);
/// ```
#[derive(Default)]
pub struct MockPaywallService {
    inner: Arc<Mutex<MockState>>,
    purchase_signal: Option<Arc<PurchaseSignal>>,
}

#[derive(Default)]
struct MockState {
    /// Scripts for upcoming presentations, one per call.
    scripts: VecDeque<Vec<PaywallStep>>,
    /// Error to return from the next `present` call.
    next_error: Option<PaywallError>,
    /// Placements requested, in order.
    presentations: Vec<String>,
}

impl MockPaywallService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `PaywallStep::Purchase` reach the given signal.
    pub fn with_purchase_signal(mut self, signal: Arc<PurchaseSignal>) -> Self {
        self.purchase_signal = Some(signal);
        self
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Queues the script for the next presentation.
    ///
    /// Presentations with no queued script stay open and never call back.
    pub fn push_script(&self, steps: Vec<PaywallStep>) {
        self.inner.lock().unwrap().scripts.push_back(steps);
    }

    /// Makes the next `present` call fail synchronously.
    pub fn fail_next(&self, error: PaywallError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn presentation_count(&self) -> usize {
        self.inner.lock().unwrap().presentations.len()
    }

    pub fn presented_placements(&self) -> Vec<String> {
        self.inner.lock().unwrap().presentations.clone()
    }
}

#[async_trait]
impl PaywallService for MockPaywallService {
    async fn present(
        &self,
        placement: &str,
        handler: Arc<dyn PaywallHandler>,
    ) -> Result<(), PaywallError> {
        let script = {
            let mut state = self.inner.lock().unwrap();
            state.presentations.push(placement.to_string());
            if let Some(error) = state.next_error.take() {
                return Err(error);
            }
            state.scripts.pop_front().unwrap_or_default()
        };

        let info = PaywallInfo {
            placement: placement.to_string(),
            paywall_id: Some(format!("mock_{}", placement)),
        };
        let signal = self.purchase_signal.clone();

        tokio::spawn(async move {
            for step in script {
                match step {
                    PaywallStep::Wait(duration) => tokio::time::sleep(duration).await,
                    PaywallStep::Present => handler.on_present(info.clone()).await,
                    PaywallStep::Purchase => {
                        if let Some(signal) = &signal {
                            signal.record_purchase();
                        }
                    }
                    PaywallStep::Dismiss(result) => handler.on_dismiss(info.clone(), result).await,
                    PaywallStep::Error(message) => handler.on_error(message).await,
                    PaywallStep::Skip(reason) => handler.on_skip(reason).await,
                }
            }
        });

        Ok(())
    }
}
