//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

mod apply_edit;

pub use apply_edit::{
    ApplyEditCommand, ApplyEditConfig, ApplyEditError, ApplyEditHandler, ApplyEditResult,
};
