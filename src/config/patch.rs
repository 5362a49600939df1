//! Patch pipeline configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Tunables for the tiered patch pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct PatchConfig {
    /// Trimmed documents shorter than this fail validation
    #[serde(default = "default_min_document_length")]
    pub min_document_length: usize,

    /// Whole-document responses shorter than this fraction of the original
    /// are rejected as truncated
    #[serde(default = "default_truncation_ratio")]
    pub truncation_ratio: f64,

    /// Token budget for a single-section generation call
    #[serde(default = "default_section_max_tokens")]
    pub section_max_tokens: u32,

    /// Token budget for a whole-document generation call
    #[serde(default = "default_document_max_tokens")]
    pub document_max_tokens: u32,

    /// Sampling temperature for every generation call
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl PatchConfig {
    /// Validate patch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.truncation_ratio > 0.0 && self.truncation_ratio <= 1.0) {
            return Err(ValidationError::InvalidTruncationRatio);
        }
        if self.section_max_tokens == 0 || self.document_max_tokens == 0 {
            return Err(ValidationError::InvalidTokenBudget);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            min_document_length: default_min_document_length(),
            truncation_ratio: default_truncation_ratio(),
            section_max_tokens: default_section_max_tokens(),
            document_max_tokens: default_document_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_min_document_length() -> usize {
    200
}

fn default_truncation_ratio() -> f64 {
    0.5
}

fn default_section_max_tokens() -> u32 {
    4096
}

fn default_document_max_tokens() -> u32 {
    16000
}

fn default_temperature() -> f32 {
    0.3
}
