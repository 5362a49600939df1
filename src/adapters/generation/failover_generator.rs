//! Failover Generator - Wrapper that provides automatic failover between backends.
//!
//! When the primary backend fails with a transient error (rate limit,
//! unavailable, network, timeout), the request is retried once on the
//! fallback backend if one is configured.
//!
//! # Example
//!
//! ```ignore
//! let generator = FailoverGenerator::new(Arc::new(anthropic))
//!     .with_fallback(Arc::new(openai));
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::ports::{
    GenerationError, GenerationRequest, GenerationResponse, GeneratorInfo, TextGenerator,
};

/// Generator wrapper with automatic failover support.
pub struct FailoverGenerator {
    primary: Arc<dyn TextGenerator>,
    fallback: Option<Arc<dyn TextGenerator>>,
}

impl FailoverGenerator {
    /// Creates a failover generator with only a primary backend.
    pub fn new(primary: Arc<dyn TextGenerator>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback backend.
    pub fn with_fallback(mut self, fallback: Arc<dyn TextGenerator>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[async_trait]
impl TextGenerator for FailoverGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
        match self.primary.generate(request.clone()).await {
            Ok(response) => Ok(response),
            Err(err) if err.is_retryable() => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        edit_id = %request.metadata.edit_id,
                        primary = %self.primary.generator_info().name,
                        fallback = %fallback.generator_info().name,
                        reason = %err,
                        "Primary generator failed, using fallback"
                    );
                    fallback.generate(request).await
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    fn generator_info(&self) -> GeneratorInfo {
        // Report primary backend's info
        self.primary.generator_info()
    }
}
