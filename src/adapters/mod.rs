//! Adapters - Implementations of port interfaces.
//!
//! - `clock` - Tokio-backed and manual clocks
//! - `entitlement` - In-memory entitlement store
//! - `network` - Watch-channel connectivity
//! - `paywall` - Channel handler and scripted paywall service

pub mod clock;
pub mod entitlement;
pub mod network;
pub mod paywall;

pub use clock::{ManualClock, TokioClock};
pub use entitlement::InMemoryEntitlementStore;
pub use network::WatchNetworkStatus;
pub use paywall::{ChannelPaywallHandler, MockPaywallService, PaywallStep};
