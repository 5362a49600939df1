//! Telemetry adapters for patch lifecycle events.

mod tracing_callback;

pub use tracing_callback::TracingPatchEventCallback;
