//! EntitlementStore port - Source of truth for subscription entitlement.
//!
//! Wraps the commerce SDK's customer-info call. `refresh` goes to the
//! network and may fail when connectivity drops; `is_entitled` returns the
//! last value the store observed without any I/O.

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by an entitlement store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    #[error("Network unavailable")]
    Offline,

    #[error("Entitlement service error: {0}")]
    Service(String),

    #[error("Entitlement request timed out")]
    Timeout,
}

/// Port for reading subscription entitlement.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Fetches current entitlement from the commerce backend.
    async fn refresh(&self) -> Result<bool, EntitlementError>;

    /// Last entitlement value observed by the store.
    fn is_entitled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn EntitlementStore) {}
    }

    #[test]
    fn error_messages() {
        assert_eq!(EntitlementError::Offline.to_string(), "Network unavailable");
        assert_eq!(
            EntitlementError::Service("503".into()).to_string(),
            "Entitlement service error: 503"
        );
    }
}
