//! Result of asking for a paywall presentation.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The paywall service accepted the presentation.
    Presented,
    /// Access is already granted; nothing to present.
    AlreadySubscribed,
    /// The onboarding presentation was already attempted.
    AlreadyAttempted,
    /// Suppressed by the call site's throttle.
    Throttled { retry_in: Duration },
    /// No connectivity; presentation not attempted.
    Offline,
    /// The fallback gate is not up.
    Inactive,
    /// Entitlement could not be determined; nothing presented.
    Undetermined,
    /// The service refused the presentation; handled as a paywall error.
    Failed(String),
}

impl PresentOutcome {
    pub fn is_presented(&self) -> bool {
        matches!(self, PresentOutcome::Presented)
    }
}
