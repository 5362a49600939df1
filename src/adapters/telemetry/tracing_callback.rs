//! Tracing-backed PatchEventCallback.
//!
//! Every lifecycle event becomes one structured log line. With the JSON
//! subscriber enabled the full event payload is attached as `payload`.

use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};
use crate::domain::patch::{EditApplied, EditFailed, StrategySelected, TierEscalated};
use crate::ports::PatchEventCallback;

/// Logs patch lifecycle events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPatchEventCallback {
    include_payload: bool,
}

impl TracingPatchEventCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the serialized event to every log line.
    pub fn with_payload(mut self) -> Self {
        self.include_payload = true;
        self
    }

    fn trace_payload<E: SerializableDomainEvent>(&self, event: &E) {
        if !self.include_payload {
            return;
        }
        match event.to_payload() {
            Ok(payload) => debug!(
                event_type = event.event_type(),
                event_id = %event.event_id(),
                payload = %payload,
                "Patch event payload"
            ),
            Err(e) => warn!(
                event_type = event.event_type(),
                error = %e,
                "Failed to serialize patch event"
            ),
        }
    }
}

impl PatchEventCallback for TracingPatchEventCallback {
    fn on_strategy_selected(&self, event: StrategySelected) {
        info!(
            edit_id = %event.edit_id,
            strategy = %event.strategy,
            targets = ?event.target_sections,
            affects_global = event.affects_global,
            complexity = ?event.complexity,
            reasoning = %event.reasoning,
            "Patch strategy selected"
        );
        self.trace_payload(&event);
    }

    fn on_tier_escalated(&self, event: TierEscalated) {
        warn!(
            edit_id = %event.edit_id,
            from = %event.from,
            to = %event.to,
            failure = %event.failure_kind,
            reason = %event.reason,
            "Patch tier failed, escalating"
        );
        self.trace_payload(&event);
    }

    fn on_edit_applied(&self, event: EditApplied) {
        info!(
            edit_id = %event.edit_id,
            tier = %event.tier,
            attempts = event.attempts,
            document_len = event.document_len,
            duration_ms = event.duration_ms,
            "Edit applied"
        );
        self.trace_payload(&event);
    }

    fn on_edit_failed(&self, event: EditFailed) {
        warn!(
            edit_id = %event.edit_id,
            last_tier = %event.last_tier,
            attempts = event.attempts,
            duration_ms = event.duration_ms,
            reason = %event.reason,
            "Edit failed on every tier"
        );
        self.trace_payload(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EditId;
    use crate::domain::patch::{classify, PatchTier, TierFailure};

    #[test]
    fn callback_accepts_every_event_without_subscriber() {
        let callback = TracingPatchEventCallback::new().with_payload();
        let edit_id = EditId::new();

        callback.on_strategy_selected(StrategySelected::new(edit_id, &classify("update the hero")));
        callback.on_tier_escalated(TierEscalated::new(
            edit_id,
            PatchTier::Incremental,
            PatchTier::CrossSection,
            &TierFailure::locator_miss("hero"),
        ));
    }

    #[test]
    fn payload_is_off_by_default() {
        assert!(!TracingPatchEventCallback::default().include_payload);
    }
}
