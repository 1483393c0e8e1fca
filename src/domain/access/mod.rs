//! Access domain module.
//!
//! Types and invariants behind the subscription gate: the tri-state access
//! value, the purchase signal, presentation guards and resolution outcomes.
//!
//! # Module Structure
//!
//! - `state` - AccessState state machine
//! - `purchase_signal` - One-slot purchase completion mailbox
//! - `latch` - One-shot onboarding presentation guard
//! - `throttle` - Per-call-site presentation spacing
//! - `schedule` - Reconciliation poll delays
//! - `outcome` - ResolutionOutcome
//! - `paywall` - Paywall callback payloads
//! - `screen` - Screen precedence
//! - `errors` - GateError

mod errors;
mod latch;
mod outcome;
mod paywall;
mod purchase_signal;
mod schedule;
mod screen;
mod state;
mod throttle;

pub use errors::GateError;
pub use latch::PresentationLatch;
pub use outcome::{FailureReason, ResolutionOutcome};
pub use paywall::{PaywallEvent, PaywallInfo, PaywallResult, SkipReason};
pub use purchase_signal::PurchaseSignal;
pub use schedule::PollSchedule;
pub use screen::{render, FallbackPresentation, Screen};
pub use state::AccessState;
pub use throttle::{AttemptDecision, PresentationAttempt};
