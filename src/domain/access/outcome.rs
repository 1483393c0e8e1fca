//! Resolution outcomes.

use super::errors::GateError;

/// Why a resolution did not reach a definite subscription answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A collaborator error caught at the orchestrator boundary.
    Error(GateError),
    /// The owning flow was torn down while resolving.
    Cancelled,
}

/// Result of resolving access after a paywall flow ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    ResolvedSubscribed,
    ResolvedNotSubscribed,
    Failed(FailureReason),
}

impl ResolutionOutcome {
    pub fn failed(error: GateError) -> Self {
        ResolutionOutcome::Failed(FailureReason::Error(error))
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self, ResolutionOutcome::ResolvedSubscribed)
    }

    /// Returns true if the user should be sent to the fallback gate.
    ///
    /// Cancellation leaves everything as it was, so it never routes.
    pub fn routes_to_fallback(&self) -> bool {
        matches!(
            self,
            ResolutionOutcome::ResolvedNotSubscribed
                | ResolutionOutcome::Failed(FailureReason::Error(_))
        )
    }
}
