//! Paywall flow value types.
//!
//! The external paywall service reports what happened to a presentation
//! through four callbacks. These types carry their payloads, and
//! `PaywallEvent` packages them as messages so they can be handled on one
//! task in arrival order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata about the paywall that was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaywallInfo {
    /// Placement the paywall was presented for.
    pub placement: String,
    /// Identifier of the paywall configuration chosen by the service.
    pub paywall_id: Option<String>,
}

impl PaywallInfo {
    pub fn for_placement(placement: impl Into<String>) -> Self {
        Self {
            placement: placement.into(),
            paywall_id: None,
        }
    }
}

/// How the user left the paywall, as reported by the service.
///
/// Advisory only: a `Declined` report can still race with a purchase
/// completion, which is why dismissal always goes through reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaywallResult {
    Purchased,
    Restored,
    Declined,
}

/// Why the service decided not to show a paywall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// User landed in a holdout group of an experiment.
    Holdout { experiment_id: String },
    /// No audience rule matched the user.
    NoAudienceMatch,
    /// Placement is not configured on the service.
    PlacementNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Holdout { experiment_id } => {
                write!(f, "holdout in experiment {}", experiment_id)
            }
            SkipReason::NoAudienceMatch => write!(f, "no audience match"),
            SkipReason::PlacementNotFound => write!(f, "placement not found"),
        }
    }
}

/// A paywall callback, captured as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaywallEvent {
    Presented(PaywallInfo),
    Dismissed {
        info: PaywallInfo,
        result: PaywallResult,
    },
    Errored(String),
    Skipped(SkipReason),
}

impl PaywallEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PaywallEvent::Presented(_) => "presented",
            PaywallEvent::Dismissed { .. } => "dismissed",
            PaywallEvent::Errored(_) => "errored",
            PaywallEvent::Skipped(_) => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_serializes_with_type_tag() {
        let reason = SkipReason::Holdout {
            experiment_id: "exp_42".to_string(),
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("\"type\":\"holdout\""));
        assert!(json.contains("\"experiment_id\":\"exp_42\""));
    }

    #[test]
    fn skip_reason_display_is_readable() {
        assert_eq!(SkipReason::NoAudienceMatch.to_string(), "no audience match");
        assert_eq!(
            SkipReason::Holdout {
                experiment_id: "exp_1".into()
            }
            .to_string(),
            "holdout in experiment exp_1"
        );
    }

    #[test]
    fn event_kind_names_each_callback() {
        let info = PaywallInfo::for_placement("onboarding_complete");
        assert_eq!(PaywallEvent::Presented(info.clone()).kind(), "presented");
        assert_eq!(
            PaywallEvent::Dismissed {
                info,
                result: PaywallResult::Declined
            }
            .kind(),
            "dismissed"
        );
        assert_eq!(PaywallEvent::Errored("offline".into()).kind(), "errored");
        assert_eq!(
            PaywallEvent::Skipped(SkipReason::PlacementNotFound).kind(),
            "skipped"
        );
    }
}
