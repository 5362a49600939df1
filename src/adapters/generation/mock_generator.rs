//! Mock Text Generator for testing.
//!
//! Provides a configurable mock implementation of the TextGenerator port,
//! allowing tests to run without calling real LLM APIs.
//!
//! # Features
//!
//! - Pre-configured responses (consumed in order)
//! - A responder closure for request-dependent answers, e.g. when several
//!   section calls run concurrently and queue order is not deterministic
//! - Simulated delays for timeout testing
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockGenerator::new()
//!     .with_response("<section class=\"hero\">New</section>")
//!     .with_error(GenerationError::unavailable("down"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    FinishReason, GenerationError, GenerationRequest, GenerationResponse, GeneratorInfo,
    TextGenerator, TokenUsage,
};

/// A configured mock response.
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Return a successful generation.
    Success {
        content: String,
        finish_reason: FinishReason,
    },
    /// Return an error.
    Error(GenerationError),
}

impl MockResponse {
    /// Successful response that stopped naturally.
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Success {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        }
    }
}

type Responder = dyn Fn(&GenerationRequest) -> MockResponse + Send + Sync;

/// Mock text generator for testing.
#[derive(Clone)]
pub struct MockGenerator {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Used once the queue is empty.
    responder: Option<Arc<Responder>>,
    info: GeneratorInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockGenerator")
            .field("info", &self.info)
            .field("delay", &self.delay)
            .field("has_responder", &self.responder.is_some())
            .finish()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Creates a new mock generator with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            responder: None,
            info: GeneratorInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::text(content))
    }

    /// Adds a response that was cut off by the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            finish_reason: FinishReason::Length,
        })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Answers from a closure once the queue is empty.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Gets the next response: queue, then responder, then a default.
    fn next_response(&self, request: &GenerationRequest) -> MockResponse {
        if let Some(queued) = self.responses.lock().unwrap().pop_front() {
            return queued;
        }
        match &self.responder {
            Some(responder) => responder(request),
            None => MockResponse::text("Mock response"),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(&request) {
            MockResponse::Success {
                content,
                finish_reason,
            } => Ok(GenerationResponse {
                usage: TokenUsage::new(
                    (request.user_message.len() / 4) as u32,
                    (content.len() / 4) as u32,
                ),
                content,
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn generator_info(&self) -> GeneratorInfo {
        self.info.clone()
    }
}
