//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `MockGenerator` - Scripted responses for testing
//! - `AnthropicGenerator` - Anthropic Messages API
//! - `OpenAIGenerator` - OpenAI Chat Completions (or compatible) API
//! - `FailoverGenerator` - Primary + fallback on transient errors

mod anthropic_generator;
mod failover_generator;
mod mock_generator;
mod openai_generator;

pub use anthropic_generator::{AnthropicConfig, AnthropicGenerator};
pub use failover_generator::FailoverGenerator;
pub use mock_generator::{MockGenerator, MockResponse};
pub use openai_generator::{OpenAIConfig, OpenAIGenerator};

use std::sync::Arc;
use tracing::info;

use crate::config::{AiConfig, AiProvider, ConfigError};
use crate::ports::TextGenerator;

/// Builds the configured backend, wrapped for failover when a fallback is set.
pub fn build_generator(config: &AiConfig) -> Result<Arc<dyn TextGenerator>, ConfigError> {
    let primary = build_single(config, config.primary_provider)?;

    let generator: Arc<dyn TextGenerator> = match config.fallback_provider {
        Some(fallback) if fallback != config.primary_provider => {
            let fallback = build_single(config, fallback)?;
            Arc::new(FailoverGenerator::new(primary).with_fallback(fallback))
        }
        _ => primary,
    };

    let info = generator.generator_info();
    info!(
        generator = %info.name,
        model = %info.model,
        fallback = ?config.fallback_provider,
        "Text generator ready"
    );
    Ok(generator)
}

fn build_single(
    config: &AiConfig,
    provider: AiProvider,
) -> Result<Arc<dyn TextGenerator>, ConfigError> {
    let setup_error = |e: crate::ports::GenerationError| ConfigError::GeneratorSetup(e.to_string());

    match provider {
        AiProvider::Anthropic => {
            let key = config
                .anthropic_api_key
                .clone()
                .ok_or(ConfigError::GeneratorSetup("ANTHROPIC_API_KEY not set".into()))?;
            let generator = AnthropicGenerator::new(
                AnthropicConfig::new(key)
                    .with_model(&config.anthropic_model)
                    .with_timeout(config.timeout())
                    .with_max_retries(config.max_retries),
            )
            .map_err(setup_error)?;
            Ok(Arc::new(generator))
        }
        AiProvider::OpenAI => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or(ConfigError::GeneratorSetup("OPENAI_API_KEY not set".into()))?;
            let mut openai = OpenAIConfig::new(key)
                .with_model(&config.openai_model)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(url) = &config.openai_base_url {
                openai = openai.with_base_url(url);
            }
            let generator = OpenAIGenerator::new(openai).map_err(setup_error)?;
            Ok(Arc::new(generator))
        }
    }
}

/// Reads "try again in Ns" from a provider error body, or `default_secs`.
pub(crate) fn parse_retry_after(error_body: &str, default_secs: u32) -> u32 {
    let message = serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    message
        .as_deref()
        .and_then(|m| m.find("try again in ").map(|idx| &m[idx + 13..]))
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(default_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_retry_after_reads_message() {
        let error = r#"{"error":{"message":"Rate limited, try again in 12s"}}"#;
        assert_eq!(parse_retry_after(error, 60), 12);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after(r#"{"error":{"message":"slow down"}}"#, 30), 30);
        assert_eq!(parse_retry_after("not json", 60), 60);
    }

    #[test]
    fn build_generator_uses_primary() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        let generator = build_generator(&config).unwrap();
        assert_eq!(generator.generator_info().name, "anthropic");
    }

    #[test]
    fn build_generator_with_fallback_reports_primary() {
        let config = AiConfig {
            primary_provider: AiProvider::OpenAI,
            openai_api_key: Some("sk-xxx".to_string()),
            fallback_provider: Some(AiProvider::Anthropic),
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        let generator = build_generator(&config).unwrap();
        assert_eq!(generator.generator_info().name, "openai");
    }

    #[test]
    fn build_generator_missing_key_fails() {
        let config = AiConfig::default();
        assert!(matches!(
            build_generator(&config),
            Err(ConfigError::GeneratorSetup(_))
        ));
    }
}
