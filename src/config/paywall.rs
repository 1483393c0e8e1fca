//! Paywall presentation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Paywall presentation configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PaywallConfig {
    /// Placement identifier presented when onboarding finishes
    #[serde(default = "default_placement")]
    pub placement: String,

    /// Delay before re-checking access after a paywall error
    #[serde(default = "default_error_retry_delay_ms")]
    pub error_retry_delay_ms: u64,

    /// Minimum spacing of unforced re-presentations by the orchestrator
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

fn default_placement() -> String {
    "onboarding_complete".to_string()
}

fn default_error_retry_delay_ms() -> u64 {
    1_000
}

fn default_retry_interval_secs() -> u64 {
    10
}

impl Default for PaywallConfig {
    fn default() -> Self {
        Self {
            placement: default_placement(),
            error_retry_delay_ms: default_error_retry_delay_ms(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

impl PaywallConfig {
    pub fn error_retry_delay(&self) -> Duration {
        Duration::from_millis(self.error_retry_delay_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Validate paywall configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.placement.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PAYWALL__PLACEMENT"));
        }
        if self.error_retry_delay_ms == 0 {
            return Err(ValidationError::ZeroDuration("paywall.error_retry_delay_ms"));
        }
        if self.retry_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("paywall.retry_interval_secs"));
        }
        Ok(())
    }
}
