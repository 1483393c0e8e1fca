//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the access gate and the outside world. Adapters implement these ports.
//!
//! - `Clock` - Monotonic time and timers
//! - `EntitlementStore` - Ground-truth subscription entitlement
//! - `NetworkStatus` - Push-updated connectivity
//! - `PaywallService` / `PaywallHandler` - External paywall presentation
//! - `FallbackGate` - Destination for unresolved access

mod clock;
mod entitlement_store;
mod fallback_gate;
mod network_status;
mod paywall_service;

pub use clock::Clock;
pub use entitlement_store::{EntitlementError, EntitlementStore};
pub use fallback_gate::{FallbackGate, FallbackReason};
pub use network_status::NetworkStatus;
pub use paywall_service::{PaywallError, PaywallHandler, PaywallService};
