//! FallbackGate port - Where unresolved access is routed.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::access::SkipReason;

/// Why the fallback gate was brought up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Reconciliation ended without confirming a subscription.
    NotConfirmed,
    /// The paywall could not be presented.
    PresentationFailed { message: String },
    /// The paywall service skipped the presentation.
    Skipped { reason: SkipReason },
}

/// Port for activating the blocking fallback gate.
#[async_trait]
pub trait FallbackGate: Send + Sync {
    async fn activate(&self, reason: FallbackReason);
}
