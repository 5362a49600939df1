//! Application layer - Commands and Handlers.
//!
//! This layer drives the patch domain and coordinates between ports.

pub mod handlers;

pub use handlers::{
    ApplyEditCommand, ApplyEditConfig, ApplyEditError, ApplyEditHandler, ApplyEditResult,
};
