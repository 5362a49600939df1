//! Text Generator Port - Interface to the generative text service.
//!
//! The patch pipeline only ever needs one capability from an LLM backend:
//! "given a system instruction and a user message, produce text". This port
//! captures exactly that, so Anthropic, OpenAI, a failover pair or a scripted
//! mock can be swapped without touching the patch logic.
//!
//! # Design
//!
//! - Non-streaming: every tier needs the complete response before it can
//!   extract, merge or validate anything
//! - The response is freeform text; callers must not assume its shape
//!   (it may be fenced, or be a whole document instead of a fragment)
//! - Error types for common failure modes (rate limits, context too long, etc.)
//!
//! # Example
//!
//! ```ignore
//! let request = GenerationRequest::new(metadata)
//!     .with_system_instruction("You edit HTML sections.")
//!     .with_user_message("Make the hero blue")
//!     .with_max_tokens(4096);
//!
//! let response = generator.generate(request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::EditId;
use crate::domain::patch::PatchTier;

/// Port for the generative text service.
///
/// Implementations connect to external LLM services and translate between
/// the provider-specific API and our request/response types.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a single system instruction + user message pair.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError>;

    /// Get backend information (name, model).
    fn generator_info(&self) -> GeneratorInfo;
}

/// Request for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Instruction that frames the model's behavior.
    pub system_instruction: String,
    /// The concrete task: current markup plus the user's change request.
    pub user_message: String,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness (0.0 = deterministic).
    pub temperature: Option<f32>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl GenerationRequest {
    /// Creates an empty request with the given metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            system_instruction: String::new(),
            user_message: String::new(),
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Sets the user message.
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = message.into();
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetadata {
    /// Edit request this call belongs to.
    pub edit_id: EditId,
    /// Tier that issued the call.
    pub tier: PatchTier,
    /// Target section, for incremental calls.
    pub section: Option<String>,
}

impl RequestMetadata {
    /// Creates metadata for a whole-document call.
    pub fn new(edit_id: EditId, tier: PatchTier) -> Self {
        Self {
            edit_id,
            tier,
            section: None,
        }
    }

    /// Creates metadata for a single-section call.
    pub fn for_section(edit_id: EditId, section: impl Into<String>) -> Self {
        Self {
            edit_id,
            tier: PatchTier::Incremental,
            section: Some(section.into()),
        }
    }
}

/// Response from one generation call.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Generated text, unprocessed.
    pub content: String,
    /// Token usage.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

impl GenerationResponse {
    /// Returns true if the model was cut off by the token limit.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason == FinishReason::Length
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
}

/// Backend information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    /// Backend name (e.g., "openai", "anthropic").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl GeneratorInfo {
    /// Creates new backend info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Generative text service errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Prompt exceeds model limit.
    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong {
        /// Actual token count.
        tokens: u32,
        /// Maximum allowed.
        max: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered with no text at all.
    #[error("empty response")]
    EmptyResponse,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl GenerationError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}
