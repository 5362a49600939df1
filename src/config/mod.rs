//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAGE_PATCHER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use page_patcher::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod logging;
mod patch;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use patch::PatchConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Generation backend configuration (Anthropic/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Patch pipeline tunables
    #[serde(default)]
    pub patch: PatchConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAGE_PATCHER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAGE_PATCHER__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    /// - `PAGE_PATCHER__PATCH__TRUNCATION_RATIO=0.6` -> `patch.truncation_ratio = 0.6`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAGE_PATCHER")
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
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.patch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("PAGE_PATCHER__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        env::remove_var("PAGE_PATCHER__AI__ANTHROPIC_API_KEY");
        env::remove_var("PAGE_PATCHER__AI__PRIMARY_PROVIDER");
        env::remove_var("PAGE_PATCHER__PATCH__TRUNCATION_RATIO");
        env::remove_var("PAGE_PATCHER__PATCH__SECTION_MAX_TOKENS");
        env::remove_var("PAGE_PATCHER__LOGGING__JSON");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-xxx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.patch.min_document_length, 200);
        assert_eq!(config.patch.truncation_ratio, 0.5);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.ai.primary_provider, AiProvider::Anthropic);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAGE_PATCHER__PATCH__TRUNCATION_RATIO", "0.75");
        env::set_var("PAGE_PATCHER__PATCH__SECTION_MAX_TOKENS", "2048");
        env::set_var("PAGE_PATCHER__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.patch.truncation_ratio, 0.75);
        assert_eq!(config.patch.section_max_tokens, 2048);
        assert!(config.logging.json);
    }

    #[test]
    fn test_primary_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAGE_PATCHER__AI__PRIMARY_PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.primary_provider, AiProvider::OpenAI);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }
}
