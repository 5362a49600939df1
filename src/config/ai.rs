//! Generation backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generation backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Primary backend
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Backend used when the primary fails with a transient error
    pub fallback_provider: Option<AiProvider>,

    /// Anthropic model identifier
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// OpenAI model identifier
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Override for OpenAI-compatible endpoints
    pub openai_base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Transport retries inside a backend adapter. Patch tiers never retry;
    /// escalation is their retry mechanism.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    fn has_key_for(&self, provider: AiProvider) -> bool {
        match provider {
            AiProvider::OpenAI => self.has_openai(),
            AiProvider::Anthropic => self.has_anthropic(),
        }
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() && !self.has_anthropic() {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        if !self.has_key_for(self.primary_provider) {
            return Err(ValidationError::MissingRequired(key_name(self.primary_provider)));
        }

        if let Some(fallback) = self.fallback_provider {
            if !self.has_key_for(fallback) {
                return Err(ValidationError::MissingRequired(key_name(fallback)));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

fn key_name(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenAI => "OPENAI_API_KEY",
        AiProvider::Anthropic => "ANTHROPIC_API_KEY",
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            fallback_provider: None,
            anthropic_model: default_anthropic_model(),
            openai_model: default_openai_model(),
            openai_base_url: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}
