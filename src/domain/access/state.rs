//! Access state machine.
//!
//! Tri-state subscription status as seen by the gate. The ordinary
//! transition table never lets `Subscribed` fall back; only an explicit
//! entitlement refresh that observes expiry may do that, and it goes
//! through `AccessState::from_entitlement` rather than `transition_to`.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Subscription access state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// Entitlement has not been determined yet.
    #[default]
    Unknown,

    /// The user holds no active subscription.
    NotSubscribed,

    /// The user holds an active subscription.
    Subscribed,
}

impl AccessState {
    /// Maps a ground-truth entitlement reading to a state.
    pub fn from_entitlement(is_entitled: bool) -> Self {
        if is_entitled {
            AccessState::Subscribed
        } else {
            AccessState::NotSubscribed
        }
    }

    /// Returns true if this state grants access to gated content.
    pub fn is_subscribed(&self) -> bool {
        matches!(self, AccessState::Subscribed)
    }

    /// Returns true if entitlement is still undetermined.
    pub fn is_unknown(&self) -> bool {
        matches!(self, AccessState::Unknown)
    }
}

impl StateMachine for AccessState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AccessState::*;
        matches!(
            (self, target),
            (Unknown, NotSubscribed) | (Unknown, Subscribed) | (NotSubscribed, Subscribed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AccessState::*;
        match self {
            Unknown => vec![NotSubscribed, Subscribed],
            NotSubscribed => vec![Subscribed],
            Subscribed => vec![],
        }
    }
}
