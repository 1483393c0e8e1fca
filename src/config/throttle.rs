//! Retry and refresh throttle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Fallback gate retry settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Minimum spacing of automatic paywall attempts from the gate
    #[serde(default = "default_auto_retry_interval_secs")]
    pub auto_retry_interval_secs: u64,
}

fn default_auto_retry_interval_secs() -> u64 {
    10
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            auto_retry_interval_secs: default_auto_retry_interval_secs(),
        }
    }
}

impl FallbackConfig {
    pub fn auto_retry_interval(&self) -> Duration {
        Duration::from_secs(self.auto_retry_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.auto_retry_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("fallback.auto_retry_interval_secs"));
        }
        Ok(())
    }
}

/// Foreground entitlement refresh settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ForegroundConfig {
    /// Minimum spacing of refreshes triggered by the app becoming active
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    20
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl ForegroundConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.refresh_interval_secs == 0 {
            return Err(ValidationError::ZeroDuration("foreground.refresh_interval_secs"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            FallbackConfig::default().auto_retry_interval(),
            Duration::from_secs(10)
        );
        assert_eq!(
            ForegroundConfig::default().refresh_interval(),
            Duration::from_secs(20)
        );
    }

    #[test]
    fn test_zero_intervals_rejected() {
        assert!(FallbackConfig {
            auto_retry_interval_secs: 0
        }
        .validate()
        .is_err());
        assert!(ForegroundConfig {
            refresh_interval_secs: 0
        }
        .validate()
        .is_err());
    }
}
