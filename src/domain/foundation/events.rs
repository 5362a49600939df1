//! Event infrastructure for diagnostic domain events.
//!
//! - `DomainEvent` - Trait that all domain events implement
//! - `SerializableDomainEvent` - JSON payload for any serializable event
//! - `domain_event!` - Macro to simplify DomainEvent implementations

use serde::Serialize;

use super::{EditId, EventId, Timestamp};

/// Trait that all domain events must implement.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string (e.g., "patch.tier_escalated").
    fn event_type(&self) -> &'static str;

    /// Returns the edit request that emitted this event.
    fn edit_id(&self) -> EditId;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Extension trait providing a JSON payload for serializable domain events.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    /// Serializes the event for structured sinks.
    fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Macro to implement DomainEvent with minimal boilerplate.
///
/// # Example
///
/// ```ignore
/// domain_event!(
///     EditApplied,
///     event_type = "patch.edit_applied",
///     edit_id = edit_id,
///     occurred_at = occurred_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        edit_id = $edit_id_field:ident,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn edit_id(&self) -> $crate::domain::foundation::EditId {
                self.$edit_id_field
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field
            }
        }
    };
}
