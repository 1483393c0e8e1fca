//! Gate configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `ENTITLEMENT_GATE`
//! prefix and `__` between nested keys. Every value has a default, so an
//! empty environment yields the standard timings.
//!
//! # Example
//!
//! ```no_run
//! use entitlement_gate::config::GateConfig;
//!
//! let config = GateConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Presenting placement {}", config.paywall.placement);
//! ```

mod error;
mod logging;
mod paywall;
mod reconciliation;
mod throttle;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use paywall::PaywallConfig;
pub use reconciliation::ReconciliationConfig;
pub use throttle::{FallbackConfig, ForegroundConfig};

use serde::Deserialize;

/// Root gate configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GateConfig {
    /// Paywall placement and error handling
    #[serde(default)]
    pub paywall: PaywallConfig,

    /// Bounded poll after a paywall dismissal
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,

    /// Fallback gate retry throttle
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Foreground refresh throttle
    #[serde(default)]
    pub foreground: ForegroundConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ENTITLEMENT_GATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ENTITLEMENT_GATE__PAYWALL__PLACEMENT=campaign` -> `paywall.placement`
    /// - `ENTITLEMENT_GATE__RECONCILIATION__MAX_ATTEMPTS=8` -> `reconciliation.max_attempts`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ENTITLEMENT_GATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for zero delays, an empty placement,
    /// inconsistent attempt counts or an unparsable log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.paywall.validate()?;
        self.reconciliation.validate()?;
        self.fallback.validate()?;
        self.foreground.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
