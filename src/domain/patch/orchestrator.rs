//! Patch Orchestrator - tier progression for one edit request
//!
//! Pure domain logic: tracks which tier is active, records every attempt and
//! decides where to go after a failure. Driving generation and merging is the
//! application handler's job.

use crate::domain::foundation::{EditId, StateMachine, ValidationError};

use super::errors::TierFailure;
use super::intent::ModificationIntent;
use super::tier::PatchTier;

/// Outcome of one tier attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TierAttempt {
    pub tier: PatchTier,
    /// `None` when the tier produced the final document.
    pub failure: Option<TierFailure>,
}

impl TierAttempt {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Tracks the fallback chain for one edit
#[derive(Debug, Clone)]
pub struct PatchOrchestrator {
    edit_id: EditId,
    intent: ModificationIntent,
    tier: PatchTier,
    exhausted: bool,
    attempts: Vec<TierAttempt>,
}

impl PatchOrchestrator {
    /// Starts at the tier matching the classifier's strategy.
    pub fn new(edit_id: EditId, intent: ModificationIntent) -> Self {
        let tier = PatchTier::from(intent.strategy());
        Self {
            edit_id,
            intent,
            tier,
            exhausted: false,
            attempts: Vec::new(),
        }
    }

    pub fn edit_id(&self) -> EditId {
        self.edit_id
    }

    pub fn intent(&self) -> &ModificationIntent {
        &self.intent
    }

    pub fn current_tier(&self) -> PatchTier {
        self.tier
    }

    /// Tier to attempt next, or `None` once done or out of tiers.
    pub fn active_tier(&self) -> Option<PatchTier> {
        if self.exhausted || self.tier.is_terminal() {
            None
        } else {
            Some(self.tier)
        }
    }

    /// True once every available tier has failed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn attempts(&self) -> &[TierAttempt] {
        &self.attempts
    }

    /// Most recent failure, if any.
    pub fn last_failure(&self) -> Option<&TierFailure> {
        self.attempts.iter().rev().find_map(|a| a.failure.as_ref())
    }

    /// Records a failed attempt at the active tier and escalates.
    ///
    /// Returns the tier to try next, or `None` when the failed tier was the
    /// last resort.
    pub fn record_failure(&mut self, failure: TierFailure) -> Option<PatchTier> {
        let tier = self.active_tier()?;
        self.attempts.push(TierAttempt {
            tier,
            failure: Some(failure),
        });

        match tier.escalate() {
            Some(next) => {
                self.tier = next;
                Some(next)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Records success at the active tier and finishes.
    ///
    /// Returns the tier that produced the document.
    pub fn record_success(&mut self) -> Result<PatchTier, ValidationError> {
        let tier = self.active_tier().ok_or_else(|| {
            ValidationError::invalid_format("patch_tier", "no active tier to complete")
        })?;

        self.tier = tier.transition_to(PatchTier::Done)?;
        self.attempts.push(TierAttempt {
            tier,
            failure: None,
        });
        Ok(tier)
    }
}
