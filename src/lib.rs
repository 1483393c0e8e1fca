//! Entitlement Gate - Subscription access resolution for paywalled apps.
//!
//! After onboarding the app shows a third-party paywall and must decide
//! whether the user is subscribed. Two independent notifications race to
//! answer that (the purchase delegate and the paywall's dismissal
//! callback), so this crate reconciles them with a bounded poll and falls
//! back to a blocking gate when access cannot be confirmed.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
