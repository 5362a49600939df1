//! Adapters - Implementations of port interfaces.
//!
//! - `generation` - TextGenerator backends (Anthropic, OpenAI, mock, failover)
//! - `telemetry` - PatchEventCallback implementations

pub mod generation;
pub mod telemetry;
