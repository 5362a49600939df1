//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, validation errors, the domain event trait and
//! the state machine trait that the patch domain is built on.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use events::{DomainEvent, SerializableDomainEvent};
pub use crate::domain_event;
pub use ids::{EditId, EventId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
