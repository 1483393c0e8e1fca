//! PaywallService port - External paywall presentation.
//!
//! The paywall service owns the purchase UI. The gate asks it to present a
//! placement and hands over a `PaywallHandler`; the service reports back
//! through exactly one of dismiss/error/skip, optionally preceded by
//! present.
//!
//! # Example
//!
//! ```ignore
//! let handler: Arc<dyn PaywallHandler> = Arc::new(ChannelPaywallHandler::new(tx));
//! paywall.present("onboarding_complete", handler).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::access::{PaywallInfo, PaywallResult, SkipReason};

/// Errors returned synchronously when a presentation cannot be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaywallError {
    #[error("Paywall service not configured")]
    NotConfigured,

    #[error("Paywall already presented")]
    AlreadyPresented,

    #[error("Paywall presentation failed: {0}")]
    Presentation(String),
}

/// Result handler registered with a presentation.
///
/// Callbacks may arrive on any task. Implementations should hand them off
/// rather than mutate shared state directly.
#[async_trait]
pub trait PaywallHandler: Send + Sync {
    /// The paywall became visible.
    async fn on_present(&self, info: PaywallInfo);

    /// The user closed the paywall.
    async fn on_dismiss(&self, info: PaywallInfo, result: PaywallResult);

    /// The paywall could not be shown or failed while visible.
    async fn on_error(&self, error: String);

    /// The service decided not to show a paywall.
    async fn on_skip(&self, reason: SkipReason);
}

/// Port for presenting the external paywall.
#[async_trait]
pub trait PaywallService: Send + Sync {
    /// Presents the paywall configured for `placement`.
    async fn present(
        &self,
        placement: &str,
        handler: Arc<dyn PaywallHandler>,
    ) -> Result<(), PaywallError>;
}
