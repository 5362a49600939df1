//! Patch domain events.
//!
//! Diagnostic events emitted while one edit request is handled:
//! - `StrategySelected` - Classifier verdict
//! - `TierEscalated` - A tier failed and a coarser one takes over
//! - `EditApplied` - A tier produced the final document
//! - `EditFailed` - Every tier failed

use serde::Serialize;

use crate::domain::foundation::{domain_event, EditId, EventId, Timestamp};

use super::errors::TierFailure;
use super::intent::{Complexity, ModificationIntent, PatchStrategy};
use super::tier::PatchTier;

// ════════════════════════════════════════════════════════════════════════════
// StrategySelected
// ════════════════════════════════════════════════════════════════════════════

/// Published once per edit, after classification.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySelected {
    pub event_id: EventId,
    pub edit_id: EditId,
    pub strategy: PatchStrategy,
    pub target_sections: Vec<String>,
    pub affects_global: bool,
    pub complexity: Complexity,
    pub reasoning: String,
    pub occurred_at: Timestamp,
}

impl StrategySelected {
    pub fn new(edit_id: EditId, intent: &ModificationIntent) -> Self {
        Self {
            event_id: EventId::new(),
            edit_id,
            strategy: intent.strategy(),
            target_sections: intent.target_sections().to_vec(),
            affects_global: intent.affects_global(),
            complexity: intent.complexity(),
            reasoning: intent.reasoning().to_string(),
            occurred_at: Timestamp::now(),
        }
    }
}

domain_event!(
    StrategySelected,
    event_type = "patch.strategy_selected",
    edit_id = edit_id,
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// TierEscalated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a tier is abandoned in favour of the next one.
#[derive(Debug, Clone, Serialize)]
pub struct TierEscalated {
    pub event_id: EventId,
    pub edit_id: EditId,
    pub from: PatchTier,
    pub to: PatchTier,
    /// Short failure label, e.g. `locator_miss`.
    pub failure_kind: String,
    pub reason: String,
    pub occurred_at: Timestamp,
}

impl TierEscalated {
    pub fn new(edit_id: EditId, from: PatchTier, to: PatchTier, failure: &TierFailure) -> Self {
        Self {
            event_id: EventId::new(),
            edit_id,
            from,
            to,
            failure_kind: failure.kind().to_string(),
            reason: failure.to_string(),
            occurred_at: Timestamp::now(),
        }
    }
}

domain_event!(
    TierEscalated,
    event_type = "patch.tier_escalated",
    edit_id = edit_id,
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// EditApplied
// ════════════════════════════════════════════════════════════════════════════

/// Published when a tier produced a valid document.
#[derive(Debug, Clone, Serialize)]
pub struct EditApplied {
    pub event_id: EventId,
    pub edit_id: EditId,
    pub tier: PatchTier,
    /// Tier attempts including the successful one.
    pub attempts: usize,
    pub document_len: usize,
    pub duration_ms: u64,
    pub occurred_at: Timestamp,
}

domain_event!(
    EditApplied,
    event_type = "patch.edit_applied",
    edit_id = edit_id,
    occurred_at = occurred_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// EditFailed
// ════════════════════════════════════════════════════════════════════════════

/// Published when no tier could apply the edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditFailed {
    pub event_id: EventId,
    pub edit_id: EditId,
    pub last_tier: PatchTier,
    pub reason: String,
    pub attempts: usize,
    pub duration_ms: u64,
    pub occurred_at: Timestamp,
}

domain_event!(
    EditFailed,
    event_type = "patch.edit_failed",
    edit_id = edit_id,
    occurred_at = occurred_at,
    event_id = event_id
);
