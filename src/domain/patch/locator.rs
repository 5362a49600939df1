//! Section Locator.
//!
//! Finds a named section inside a document snapshot using an ordered list of
//! strategies. The default list tries explicit sentinel comments first and
//! falls back to structural pattern matching:
//!
//! ```text
//! <!-- HERO_START -->            <- marker tier (exact, trusted)
//! <section class="hero">...</section>
//! <!-- HERO_END -->
//!
//! <footer>...</footer>           <- semantic tier (heuristic)
//! ```
//!
//! A miss is not an error: callers escalate to a coarser patch strategy.

use tracing::{debug, warn};

use super::catalog::{end_marker, section_spec, start_marker, SemanticPattern};
use super::markup::{find_balanced_end, Tag, TagKind, TagScanner};
use super::section::Section;

/// Elements that may act as a section container for attribute patterns.
const CONTAINER_ELEMENTS: &[&str] = &[
    "section", "div", "header", "footer", "nav", "article", "aside", "main", "form",
];

/// One way of locating a section.
pub trait LocateStrategy: Send + Sync {
    /// Short label for diagnostics.
    fn label(&self) -> &'static str;

    /// Locate `name` in `document`, or `None`.
    fn locate(&self, document: &str, name: &str) -> Option<Section>;
}

/// Finds sections bounded by `<!-- NAME_START -->` / `<!-- NAME_END -->`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerStrategy;

impl LocateStrategy for MarkerStrategy {
    fn label(&self) -> &'static str {
        "marker"
    }

    fn locate(&self, document: &str, name: &str) -> Option<Section> {
        locate_by_markers(document, name)
    }
}

/// Finds sections by the catalog's structural patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticStrategy;

impl LocateStrategy for SemanticStrategy {
    fn label(&self) -> &'static str {
        "semantic"
    }

    fn locate(&self, document: &str, name: &str) -> Option<Section> {
        let found = match section_spec(name) {
            Some(spec) => spec
                .patterns
                .iter()
                .find_map(|pattern| match_pattern(document, *pattern)),
            // uncatalogued sections are looked up by their own name
            None => match_attribute(document, name),
        };

        found.map(|(start, end)| Section {
            name: name.to_string(),
            content: document[start..end].to_string(),
            start_index: start,
            end_index: end,
            has_marker: false,
        })
    }
}

/// Ordered strategy list; the first strategy that finds the section wins.
pub struct SectionLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for SectionLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionLocator {
    /// Marker tier, then semantic tier.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(MarkerStrategy), Box::new(SemanticStrategy)],
        }
    }

    /// Marker tier only.
    pub fn markers_only() -> Self {
        Self {
            strategies: vec![Box::new(MarkerStrategy)],
        }
    }

    /// Appends a strategy with the lowest priority.
    pub fn with_strategy(mut self, strategy: Box<dyn LocateStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Locates `name` (case-insensitive) in `document`.
    pub fn locate(&self, document: &str, name: &str) -> Option<Section> {
        let name = name.trim().to_lowercase();
        for strategy in &self.strategies {
            if let Some(section) = strategy.locate(document, &name) {
                debug!(
                    section = %name,
                    strategy = strategy.label(),
                    start = section.start_index,
                    end = section.end_index,
                    "Section located"
                );
                return Some(section);
            }
        }
        debug!(section = %name, "Section not found by any strategy");
        None
    }
}

impl std::fmt::Debug for SectionLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.strategies.iter().map(|s| s.label()).collect();
        f.debug_struct("SectionLocator").field("strategies", &labels).finish()
    }
}

/// Locates `name` with the default strategy list.
pub fn locate(document: &str, name: &str) -> Option<Section> {
    SectionLocator::new().locate(document, name)
}

/// Marker tier on its own.
///
/// A start sentinel without a matching end sentinel is never trusted.
pub fn locate_by_markers(document: &str, name: &str) -> Option<Section> {
    let start_marker = start_marker(name);
    let end_marker = end_marker(name);

    let start = document.find(&start_marker)?;
    let content_start = start + start_marker.len();

    let Some(relative_end) = document[content_start..].find(&end_marker) else {
        warn!(section = %name, "Start marker has no matching end marker; ignoring it");
        return None;
    };
    let content_end = content_start + relative_end;

    Some(Section {
        name: name.to_string(),
        content: document[content_start..content_end].to_string(),
        start_index: start,
        end_index: content_end + end_marker.len(),
        has_marker: true,
    })
}

/// Byte range of the first balanced element matching `pattern`.
fn match_pattern(document: &str, pattern: SemanticPattern) -> Option<(usize, usize)> {
    match pattern {
        SemanticPattern::Element(element) => first_balanced(document, |tag| tag.name == element),
        SemanticPattern::Attribute(needle) => match_attribute(document, needle),
    }
}

fn match_attribute(document: &str, needle: &str) -> Option<(usize, usize)> {
    first_balanced(document, |tag| {
        CONTAINER_ELEMENTS.contains(&tag.name.as_str()) && tag.class_or_id_contains(needle)
    })
}

fn first_balanced<F>(document: &str, matches: F) -> Option<(usize, usize)>
where
    F: Fn(&Tag<'_>) -> bool,
{
    TagScanner::new(document)
        .filter(|tag| tag.kind == TagKind::Open && matches(tag))
        .find_map(|tag| find_balanced_end(document, &tag).map(|end| (tag.start, end)))
}
