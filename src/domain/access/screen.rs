//! Screen selection.
//!
//! Which top-level screen the UI shows, and what the fallback gate shows
//! while it is up, as pure functions of the access inputs.

use serde::Serialize;

use super::state::AccessState;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Onboarding,
    FallbackGate,
    Content,
}

/// Picks the top-level screen.
///
/// Precedence: onboarding first, then content once subscribed or once the
/// paywall presentation was resolved, then a loading screen while access
/// is still unknown, and the fallback gate otherwise.
pub fn render(state: AccessState, is_onboarding: bool, is_presentation_resolved: bool) -> Screen {
    if is_onboarding {
        return Screen::Onboarding;
    }
    match state {
        AccessState::Subscribed => Screen::Content,
        _ if is_presentation_resolved => Screen::Content,
        AccessState::Unknown => Screen::Loading,
        AccessState::NotSubscribed => Screen::FallbackGate,
    }
}

/// What the fallback gate displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPresentation {
    /// Spinner while entitlement is being checked.
    CheckingSubscription,
    /// Offline notice with a manual retry.
    RequiresConnection,
    /// Paywall affordance, with an automatic throttled attempt.
    ShowPaywall,
    /// Access confirmed; the gate removes itself.
    Dismissed,
}

impl FallbackPresentation {
    pub fn derive(state: AccessState, is_online: bool) -> Self {
        match state {
            AccessState::Unknown => FallbackPresentation::CheckingSubscription,
            AccessState::NotSubscribed if is_online => FallbackPresentation::ShowPaywall,
            AccessState::NotSubscribed => FallbackPresentation::RequiresConnection,
            AccessState::Subscribed => FallbackPresentation::Dismissed,
        }
    }
}
