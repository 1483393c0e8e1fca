//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Duration must be greater than zero: {0}")]
    ZeroDuration(&'static str),

    #[error("fast_attempts ({fast}) exceeds max_attempts ({max})")]
    FastAttemptsExceedMax { fast: u32, max: u32 },

    #[error("max_attempts must be between 1 and {limit}, got {actual}")]
    MaxAttemptsOutOfRange { limit: u32, actual: u32 },

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
