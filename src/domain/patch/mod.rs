//! Patch domain - incremental editing of generated HTML documents.
//!
//! # Components
//!
//! - `intent` / `catalog` - classify an instruction into a patch strategy
//! - `locator` / `markup` - find section ranges in a document snapshot
//! - `merger` / `validator` / `extraction` - splice, check and clean content
//! - `tier` / `orchestrator` - forward-only fallback chain
//! - `events` / `prompts` - diagnostics and generation prompt text

pub mod catalog;
pub mod errors;
pub mod events;
pub mod extraction;
pub mod intent;
pub mod locator;
pub mod markup;
pub mod merger;
pub mod orchestrator;
pub mod prompts;
pub mod section;
pub mod tier;
pub mod validator;

pub use catalog::{end_marker, section_spec, start_marker, SectionSpec, SECTION_CATALOG};
pub use errors::TierFailure;
pub use events::{EditApplied, EditFailed, StrategySelected, TierEscalated};
pub use extraction::{
    document_from_response, extract_content_from_response, is_full_document, strip_code_fences,
};
pub use intent::{
    classify, Complexity, EditIntentClassifier, KeywordIntentClassifier, ModificationIntent,
    PatchStrategy,
};
pub use locator::{locate, locate_by_markers, LocateStrategy, SectionLocator};
pub use merger::{merge, MergeError, Replacement};
pub use orchestrator::{PatchOrchestrator, TierAttempt};
pub use section::Section;
pub use tier::PatchTier;
pub use validator::{validate, DocumentValidator, ValidationResult};
