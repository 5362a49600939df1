//! Domain layer containing the patch engine's pure logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `patch` - Intent classification, section location, merging, validation and tiers

pub mod foundation;
pub mod patch;
