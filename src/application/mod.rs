//! Application layer - Services coordinating the access domain and ports.
//!
//! - `access_state_machine` - Owner of the shared access state
//! - `reconciler` - Bounded poll after a paywall dismissal
//! - `paywall_orchestrator` - Onboarding paywall and callback handling
//! - `fallback_gate_controller` - Blocking gate for unconfirmed access
//! - `foreground_refresher` - Throttled refresh on app activation
//! - `gate` - Wiring and lifecycle entry points

mod access_state_machine;
mod fallback_gate_controller;
mod foreground_refresher;
mod gate;
mod paywall_orchestrator;
mod present_outcome;
mod reconciler;
mod shutdown;

pub use access_state_machine::AccessStateMachine;
pub use fallback_gate_controller::FallbackGateController;
pub use foreground_refresher::{ForegroundRefresher, RefreshDecision};
pub use gate::{EntitlementGate, GateDependencies};
pub use paywall_orchestrator::PaywallOrchestrator;
pub use present_outcome::PresentOutcome;
pub use reconciler::{Reconciler, Reconciliation};
