//! Paywall adapters.
//!
//! - `ChannelPaywallHandler` - Forwards paywall callbacks onto a channel
//! - `MockPaywallService` - Scripted paywall for tests and the demo binary

mod channel_handler;
mod mock_paywall_service;

pub use channel_handler::ChannelPaywallHandler;
pub use mock_paywall_service::{MockPaywallService, PaywallStep};
