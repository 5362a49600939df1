//! Edit intent classification.
//!
//! Maps a free-text change request to the cheapest patch strategy that can
//! safely express it. Rules are ordered and the first match wins:
//!
//! 1. structural change (add/remove/reorder whole sections) -> full regeneration
//! 2. document-wide scope ("every", "all", "throughout") -> cross-section rewrite
//! 3. section keywords, then secondary hints -> target sections
//! 4. 1-2 sections -> incremental, 3+ -> cross-section, none -> full regeneration

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::catalog::{SECTION_CATALOG, SECTION_HINTS};

/// Largest number of sections an incremental patch may touch.
pub const MAX_INCREMENTAL_SECTIONS: usize = 2;

/// How an edit will be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchStrategy {
    /// Regenerate only the targeted sections and splice them back.
    Incremental,
    /// Rewrite the whole document in one call, preserving unrelated content.
    CrossSection,
    /// Regenerate the document outright.
    FullRegen,
}

impl fmt::Display for PatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatchStrategy::Incremental => "incremental",
            PatchStrategy::CrossSection => "cross-section",
            PatchStrategy::FullRegen => "full-regen",
        };
        write!(f, "{}", s)
    }
}

/// Advisory size of an edit. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Classifier verdict for one instruction.
///
/// Immutable once built. An incremental intent always targets one or two
/// sections and never affects the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModificationIntent {
    strategy: PatchStrategy,
    target_sections: Vec<String>,
    affects_global: bool,
    complexity: Complexity,
    reasoning: String,
}

impl ModificationIntent {
    /// Builds an intent, enforcing the incremental invariant.
    ///
    /// Target sections are deduplicated, keeping first-seen order.
    pub fn new(
        strategy: PatchStrategy,
        target_sections: Vec<String>,
        affects_global: bool,
        complexity: Complexity,
        reasoning: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut deduped: Vec<String> = Vec::with_capacity(target_sections.len());
        for section in target_sections {
            if !deduped.contains(&section) {
                deduped.push(section);
            }
        }

        if strategy == PatchStrategy::Incremental {
            if deduped.is_empty() || deduped.len() > MAX_INCREMENTAL_SECTIONS {
                return Err(ValidationError::invalid_format(
                    "target_sections",
                    format!(
                        "incremental edits need 1 to {} sections, got {}",
                        MAX_INCREMENTAL_SECTIONS,
                        deduped.len()
                    ),
                ));
            }
            if affects_global {
                return Err(ValidationError::invalid_format(
                    "affects_global",
                    "incremental edits cannot affect the whole document",
                ));
            }
        }

        Ok(Self {
            strategy,
            target_sections: deduped,
            affects_global,
            complexity,
            reasoning: reasoning.into(),
        })
    }

    /// Full regeneration intent with no targets.
    pub fn full_regen(complexity: Complexity, reasoning: impl Into<String>) -> Self {
        Self {
            strategy: PatchStrategy::FullRegen,
            target_sections: Vec::new(),
            affects_global: false,
            complexity,
            reasoning: reasoning.into(),
        }
    }

    /// Whole-document rewrite intent for edits that cannot be localized.
    pub fn global_rewrite(reasoning: impl Into<String>) -> Self {
        Self {
            strategy: PatchStrategy::CrossSection,
            target_sections: Vec::new(),
            affects_global: true,
            complexity: Complexity::Complex,
            reasoning: reasoning.into(),
        }
    }

    pub fn strategy(&self) -> PatchStrategy {
        self.strategy
    }

    pub fn target_sections(&self) -> &[String] {
        &self.target_sections
    }

    pub fn affects_global(&self) -> bool {
        self.affects_global
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

/// Classifies a change request into a [`ModificationIntent`].
pub trait EditIntentClassifier: Send + Sync {
    /// Classify one instruction. Must be pure and deterministic.
    fn classify(&self, instruction: &str) -> ModificationIntent;
}

/// Keyword and pattern based classifier (default implementation).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentClassifier;

impl EditIntentClassifier for KeywordIntentClassifier {
    fn classify(&self, instruction: &str) -> ModificationIntent {
        classify(instruction)
    }
}

static STRUCTURAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(add|insert|create|append|include)\s+(a|an|another|one|some)\s+(new\s+)?([a-z-]+\s+)?sections?\b",
        r"\bnew\s+([a-z-]+\s+)?section\b",
        // the section itself is the object, not something inside it
        r"\b(remove|delete|drop)\s+(the\s+)?([a-z-]+\s+)?sections?\s+(\z|(and|then|entirely|completely|altogether|from\s+(the\s+)?(page|site))\b)",
        r"\bget rid of\s+(the\s+)?([a-z-]+\s+)?sections?\s+(\z|(and|then|entirely|completely|altogether|from\s+(the\s+)?(page|site))\b)",
        r"\b(reorder|re-order|rearrange|restructure|reorganize|reorganise)\b",
        r"\bmove\s+the\s+[a-z-]+\s+section\b",
        r"\bswap\s+the\b.*\bsections?\b",
        r"\b(redesign|from scratch|start over)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("structural pattern is valid"))
    .collect()
});

static GLOBAL_TERMS: &[&str] = &[
    "all",
    "every",
    "everything",
    "everywhere",
    "throughout",
    "entire page",
    "entire site",
    "whole page",
    "whole site",
    "site-wide",
    "sitewide",
    "globally",
    "each section",
    "across the page",
];

/// Classifies an instruction with the built-in rules.
pub fn classify(instruction: &str) -> ModificationIntent {
    let text = normalize(instruction);

    if let Some(phrase) = structural_phrase(&text) {
        return ModificationIntent::full_regen(
            Complexity::Complex,
            format!(
                "Structural change detected (\"{}\"); sections cannot be patched in place",
                phrase
            ),
        );
    }

    if let Some(term) = GLOBAL_TERMS.iter().find(|term| find_term(&text, term).is_some()) {
        return ModificationIntent::global_rewrite(format!(
            "Document-wide scope detected (\"{}\"); edit cannot be localized",
            term
        ));
    }

    let (sections, via_hint) = detect_sections(&text);
    let word_count = text.split_whitespace().count();

    let built = match sections.len() {
        0 => Ok(ModificationIntent::full_regen(
            Complexity::Moderate,
            "No target section identified; regenerating to avoid an incomplete patch",
        )),
        n if n <= MAX_INCREMENTAL_SECTIONS => {
            let complexity = if n == 1 && word_count <= 20 {
                Complexity::Simple
            } else {
                Complexity::Moderate
            };
            let source = if via_hint { "inferred" } else { "named" };
            let reasoning = format!(
                "Edit limited to {} {} section(s): {}",
                n,
                source,
                sections.join(", ")
            );
            ModificationIntent::new(
                PatchStrategy::Incremental,
                sections,
                false,
                complexity,
                reasoning,
            )
        }
        n => {
            let reasoning = format!(
                "Edit spans {} sections ({}); rewriting the document in one pass",
                n,
                sections.join(", ")
            );
            ModificationIntent::new(
                PatchStrategy::CrossSection,
                sections,
                false,
                Complexity::Complex,
                reasoning,
            )
        }
    };

    built.unwrap_or_else(|err| {
        ModificationIntent::full_regen(Complexity::Moderate, format!("Fallback: {}", err))
    })
}

/// Finds the sections an instruction names, in first-seen order.
///
/// Returns the sections and whether they came from secondary hints.
fn detect_sections(text: &str) -> (Vec<String>, bool) {
    let mut hits: Vec<(usize, &'static str)> = SECTION_CATALOG
        .iter()
        .filter_map(|spec| {
            spec.keywords
                .iter()
                .filter_map(|keyword| find_term(text, keyword))
                .min()
                .map(|position| (position, spec.name))
        })
        .collect();

    if hits.is_empty() {
        hits = SECTION_HINTS
            .iter()
            .filter(|hint| !hint.unless.iter().any(|word| find_term(text, word).is_some()))
            .filter_map(|hint| {
                hint.words
                    .iter()
                    .filter_map(|word| find_term(text, word))
                    .min()
                    .map(|position| (position, hint.section))
            })
            .collect();
        hits.sort_by_key(|(position, _)| *position);
        return (dedup_names(hits), true);
    }

    hits.sort_by_key(|(position, _)| *position);
    (dedup_names(hits), false)
}

fn dedup_names(hits: Vec<(usize, &'static str)>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(hits.len());
    for (_, name) in hits {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn structural_phrase(text: &str) -> Option<String> {
    STRUCTURAL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|found| found.as_str().trim().to_string())
}

/// Lowercases and reduces punctuation to single spaces, padded on both ends
/// so whole-word lookups can search for `" term "`.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect();
    let mut normalized = String::with_capacity(cleaned.len() + 2);
    normalized.push(' ');
    for word in cleaned.split_whitespace() {
        normalized.push_str(word);
        normalized.push(' ');
    }
    normalized
}

/// Byte position of a whole-word (or whole-phrase) match.
fn find_term(text: &str, term: &str) -> Option<usize> {
    text.find(&format!(" {} ", term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(intent: &ModificationIntent) -> Vec<&str> {
        intent.target_sections().iter().map(String::as_str).collect()
    }

    #[test]
    fn single_section_is_incremental() {
        let intent = classify("make the footer darker");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["footer"]);
        assert!(!intent.affects_global());
        assert_eq!(intent.complexity(), Complexity::Simple);
    }

    #[test]
    fn hero_background_targets_hero_only() {
        let intent = classify("change the hero background to blue");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["hero"]);
    }

    #[test]
    fn two_sections_stay_incremental_in_first_seen_order() {
        let intent = classify("Make the footer match the navbar colors");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["footer", "navbar"]);
        assert_eq!(intent.complexity(), Complexity::Moderate);
    }

    #[test]
    fn synonyms_are_deduplicated() {
        let intent = classify("update the menu and the navigation links in the nav bar");
        assert_eq!(sections(&intent), vec!["navbar"]);
    }

    #[test]
    fn three_sections_become_cross_section() {
        let intent = classify("use a serif font in the hero, the about text and the footer");
        assert_eq!(intent.strategy(), PatchStrategy::CrossSection);
        assert_eq!(sections(&intent), vec!["hero", "about", "footer"]);
        assert!(!intent.affects_global());
    }

    #[test]
    fn structural_change_wins_over_section_keywords() {
        let intent = classify("restructure the page and add a pricing section");
        assert_eq!(intent.strategy(), PatchStrategy::FullRegen);
        assert!(intent.target_sections().is_empty());
        assert_eq!(intent.complexity(), Complexity::Complex);

        let intent = classify("Add a section with testimonials under the hero");
        assert_eq!(intent.strategy(), PatchStrategy::FullRegen);

        let intent = classify("remove the about section");
        assert_eq!(intent.strategy(), PatchStrategy::FullRegen);
    }

    #[test]
    fn editing_inside_a_section_is_not_structural() {
        let intent = classify("add a testimonials quote from Dana");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["testimonials"]);

        let intent = classify("remove the button from the hero section");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["hero"]);
    }

    #[test]
    fn removing_something_inside_a_named_section_is_incremental() {
        let intent = classify("remove the hero section background image");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["hero"]);

        let intent = classify("drop the footer section border");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert_eq!(sections(&intent), vec!["footer"]);
    }

    #[test]
    fn removing_a_whole_section_is_structural() {
        for instruction in [
            "remove the pricing section",
            "Delete the FAQ section.",
            "delete the faq section and the cta",
            "get rid of the gallery section entirely",
            "drop the team section from the page",
        ] {
            assert_eq!(
                classify(instruction).strategy(),
                PatchStrategy::FullRegen,
                "{}",
                instruction
            );
        }
    }

    #[test]
    fn structural_patterns_all_compile() {
        assert_eq!(STRUCTURAL_PATTERNS.len(), 8);
    }

    #[test]
    fn global_scope_is_cross_section() {
        let intent = classify("change every heading color to red");
        assert_eq!(intent.strategy(), PatchStrategy::CrossSection);
        assert!(intent.affects_global());
        assert!(intent.target_sections().is_empty());

        let intent = classify("Use rounded corners throughout");
        assert!(intent.affects_global());
    }

    #[test]
    fn global_terms_need_word_boundaries() {
        let intent = classify("make the footer text smaller");
        assert_eq!(intent.strategy(), PatchStrategy::Incremental);
        assert!(!intent.affects_global());
    }

    #[test]
    fn secondary_hints_apply_without_keywords() {
        assert_eq!(sections(&classify("make the logo bigger")), vec!["navbar"]);
        assert_eq!(sections(&classify("update the copyright year")), vec!["footer"]);
        assert_eq!(sections(&classify("shorten the main title")), vec!["hero"]);
    }

    #[test]
    fn keywords_take_precedence_over_hints() {
        let intent = classify("change the footer title to Contact us");
        assert_eq!(sections(&intent), vec!["footer", "contact"]);
    }

    #[test]
    fn unknown_target_defaults_to_full_regen() {
        let intent = classify("make it pop more");
        assert_eq!(intent.strategy(), PatchStrategy::FullRegen);
        assert!(intent.target_sections().is_empty());
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("MAKE THE FOOTER DARKER"), classify("make the footer darker"));
    }

    #[test]
    fn incremental_invariant_is_enforced() {
        let too_many = ModificationIntent::new(
            PatchStrategy::Incremental,
            vec!["hero".into(), "footer".into(), "about".into()],
            false,
            Complexity::Simple,
            "",
        );
        assert!(too_many.is_err());

        let global = ModificationIntent::new(
            PatchStrategy::Incremental,
            vec!["hero".into()],
            true,
            Complexity::Simple,
            "",
        );
        assert!(global.is_err());

        let deduped = ModificationIntent::new(
            PatchStrategy::Incremental,
            vec!["hero".into(), "hero".into()],
            false,
            Complexity::Simple,
            "",
        )
        .unwrap();
        assert_eq!(deduped.target_sections(), ["hero".to_string()]);
    }

    #[test]
    fn reasoning_mentions_targets() {
        let intent = classify("make the footer darker");
        assert!(intent.reasoning().contains("footer"));
    }

    #[test]
    fn strategy_serializes_kebab_case() {
        let json = serde_json::to_string(&PatchStrategy::CrossSection).unwrap();
        assert_eq!(json, "\"cross-section\"");
        assert_eq!(PatchStrategy::FullRegen.to_string(), "full-regen");
    }
}
