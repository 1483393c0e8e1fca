//! Access-gate error types.
//!
//! None of these are fatal. Each one maps onto a defined access state and
//! a UI affordance:
//!
//! | Error | Recovery |
//! |-------|----------|
//! | EntitlementRefreshFailed | Keep last-known state, retry next throttle window |
//! | PaywallPresentationFailed | Fallback gate after a fixed delay |
//! | PaywallSkipped | Fallback gate unless already subscribed |

use thiserror::Error;

use super::paywall::SkipReason;

/// Errors surfaced by the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Entitlement refresh failed: {0}")]
    EntitlementRefreshFailed(String),

    #[error("Paywall presentation failed: {0}")]
    PaywallPresentationFailed(String),

    #[error("Paywall skipped: {0}")]
    PaywallSkipped(SkipReason),
}

impl GateError {
    pub fn refresh_failed(reason: impl Into<String>) -> Self {
        GateError::EntitlementRefreshFailed(reason.into())
    }

    pub fn presentation_failed(reason: impl Into<String>) -> Self {
        GateError::PaywallPresentationFailed(reason.into())
    }

    /// Returns true if retrying later may succeed without user action.
    pub fn is_transient(&self) -> bool {
        matches!(self, GateError::EntitlementRefreshFailed(_))
    }
}
