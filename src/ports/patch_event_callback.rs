//! Patch Event Callback Port - receives diagnostic events from the edit handler.
//!
//! Purely observational: callbacks cannot influence tier selection and are
//! invoked synchronously, so implementations should return quickly.

use crate::domain::patch::{EditApplied, EditFailed, StrategySelected, TierEscalated};

/// Callback for receiving patch lifecycle events.
pub trait PatchEventCallback: Send + Sync {
    /// Called once per edit after classification.
    fn on_strategy_selected(&self, event: StrategySelected);

    /// Called when a tier fails and a coarser tier takes over.
    fn on_tier_escalated(&self, event: TierEscalated);

    /// Called when a tier produced the final document.
    fn on_edit_applied(&self, event: EditApplied);

    /// Called when every tier failed.
    fn on_edit_failed(&self, event: EditFailed);
}

/// No-op callback for when diagnostics aren't needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPatchEventCallback;

impl PatchEventCallback for NoOpPatchEventCallback {
    fn on_strategy_selected(&self, _event: StrategySelected) {}
    fn on_tier_escalated(&self, _event: TierEscalated) {}
    fn on_edit_applied(&self, _event: EditApplied) {}
    fn on_edit_failed(&self, _event: EditFailed) {}
}
