//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Generation backend setup failed: {0}")]
    GeneratorSetup(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("No generation backend configured")]
    NoAiProviderConfigured,

    #[error("Truncation ratio must be in (0, 1]")]
    InvalidTruncationRatio,

    #[error("Token budgets must be positive")]
    InvalidTokenBudget,

    #[error("Temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("Invalid log filter directive")]
    InvalidLogFilter,
}
