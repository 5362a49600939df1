//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Generative text service used by every patch tier
//! - `PatchEventCallback` - Diagnostic hooks for strategy and tier changes

mod patch_event_callback;
mod text_generator;

pub use patch_event_callback::{NoOpPatchEventCallback, PatchEventCallback};
pub use text_generator::{
    FinishReason, GenerationError, GenerationRequest, GenerationResponse, GeneratorInfo,
    RequestMetadata, TextGenerator, TokenUsage,
};
