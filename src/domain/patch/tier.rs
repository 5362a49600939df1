//! Patch tier state machine.
//!
//! ```text
//! Incremental ──► CrossSection ──► FullRegen ──► Done
//!      │               │                           ▲
//!      └───────────────┴───────────────────────────┘
//! ```
//!
//! Tiers only move forward. Any tier may finish at `Done` on success.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::intent::PatchStrategy;
use crate::domain::foundation::StateMachine;

/// Current tier of one edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchTier {
    Incremental,
    CrossSection,
    FullRegen,
    Done,
}

impl PatchTier {
    /// Next, coarser tier after a failure; `None` once nothing is left.
    pub fn escalate(&self) -> Option<PatchTier> {
        match self {
            PatchTier::Incremental => Some(PatchTier::CrossSection),
            PatchTier::CrossSection => Some(PatchTier::FullRegen),
            PatchTier::FullRegen | PatchTier::Done => None,
        }
    }

    /// True for the tier that has no fallback.
    pub fn is_last_resort(&self) -> bool {
        matches!(self, PatchTier::FullRegen)
    }
}

impl StateMachine for PatchTier {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PatchTier::*;
        match self {
            Incremental => vec![CrossSection, Done],
            CrossSection => vec![FullRegen, Done],
            FullRegen => vec![Done],
            Done => vec![],
        }
    }
}

impl From<PatchStrategy> for PatchTier {
    fn from(strategy: PatchStrategy) -> Self {
        match strategy {
            PatchStrategy::Incremental => PatchTier::Incremental,
            PatchStrategy::CrossSection => PatchTier::CrossSection,
            PatchStrategy::FullRegen => PatchTier::FullRegen,
        }
    }
}

impl fmt::Display for PatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatchTier::Incremental => "incremental",
            PatchTier::CrossSection => "cross-section",
            PatchTier::FullRegen => "full-regen",
            PatchTier::Done => "done",
        };
        f.write_str(label)
    }
}
