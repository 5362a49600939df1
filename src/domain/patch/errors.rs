//! Error types for the patch domain

use super::merger::MergeError;
use crate::ports::GenerationError;

/// Why a single tier attempt was abandoned.
///
/// Never surfaced to the caller directly: every failure below the last
/// tier turns into an escalation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TierFailure {
    #[error("Section '{section}' could not be located")]
    LocatorMiss { section: String },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Candidate document failed validation: {}", .0.join("; "))]
    ValidationFailure(Vec<String>),

    #[error("Suspected truncation: {candidate_len} characters returned for a {original_len} character document")]
    TruncationSuspected {
        original_len: usize,
        candidate_len: usize,
    },

    #[error("Merge conflict: {0}")]
    MergeConflict(#[from] MergeError),
}

impl TierFailure {
    pub fn locator_miss(section: impl Into<String>) -> Self {
        Self::LocatorMiss {
            section: section.into(),
        }
    }

    /// Short label for logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            TierFailure::LocatorMiss { .. } => "locator_miss",
            TierFailure::Generation(_) => "generation",
            TierFailure::ValidationFailure(_) => "validation_failure",
            TierFailure::TruncationSuspected { .. } => "truncation_suspected",
            TierFailure::MergeConflict(_) => "merge_conflict",
        }
    }
}

impl From<GenerationError> for TierFailure {
    fn from(err: GenerationError) -> Self {
        TierFailure::Generation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_miss_names_section() {
        let err = TierFailure::locator_miss("testimonials");
        assert_eq!(err.to_string(), "Section 'testimonials' could not be located");
        assert_eq!(err.kind(), "locator_miss");
    }

    #[test]
    fn test_validation_failure_joins_errors() {
        let err = TierFailure::ValidationFailure(vec!["a".into(), "b".into()]);
        assert!(err.to_string().ends_with("a; b"));
    }

    #[test]
    fn test_generation_error_converts() {
        let err: TierFailure = GenerationError::network("reset").into();
        assert!(matches!(err, TierFailure::Generation(ref msg) if msg.contains("reset")));
    }

    #[test]
    fn test_merge_error_converts() {
        let err: TierFailure = MergeError::Overlap {
            first: "a".into(),
            second: "b".into(),
        }
        .into();
        assert_eq!(err.kind(), "merge_conflict");
    }
}
