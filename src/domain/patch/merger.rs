//! Splices replacement content back into a document snapshot.
//!
//! Replacements are applied from the rightmost range to the leftmost so that
//! a length change in one section never shifts the offsets of the sections
//! still waiting to be applied.

use thiserror::Error;

use super::catalog::{end_marker, start_marker};
use super::section::Section;

/// New content for one previously located section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub section: Section,
    pub new_content: String,
}

impl Replacement {
    pub fn new(section: Section, new_content: impl Into<String>) -> Self {
        Self {
            section,
            new_content: new_content.into(),
        }
    }

    /// Keeps the whitespace that surrounded the original content.
    ///
    /// Generated markup usually arrives trimmed; re-applying the original
    /// padding keeps the sentinels on their own lines.
    pub fn preserving_padding(section: Section, new_content: &str) -> Self {
        let original = section.content.as_str();
        let leading = &original[..original.len() - original.trim_start().len()];
        let trailing = &original[original.trim_end().len()..];
        let trimmed = new_content.trim();

        let new_content = if trimmed.is_empty() {
            original.to_string()
        } else {
            format!("{}{}{}", leading, trimmed, trailing)
        };
        Self::new(section, new_content)
    }

    /// Text that replaces the section's full range.
    fn rendered(&self) -> String {
        if self.section.has_marker {
            format!(
                "{}{}{}",
                start_marker(&self.section.name),
                self.new_content,
                end_marker(&self.section.name)
            )
        } else {
            self.new_content.clone()
        }
    }
}

/// Errors that make a replacement set unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("sections '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },

    #[error("section '{section}' range {start}..{end} is outside a document of {len} bytes")]
    OutOfBounds {
        section: String,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Applies every replacement to `document` and returns the new document.
///
/// All ranges must come from `document` itself. The result does not depend on
/// the order of `replacements`.
pub fn merge(document: &str, replacements: &[Replacement]) -> Result<String, MergeError> {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by(|a, b| b.section.start_index.cmp(&a.section.start_index));

    for replacement in &ordered {
        let section = &replacement.section;
        let in_bounds = section.start_index <= section.end_index
            && section.end_index <= document.len()
            && document.is_char_boundary(section.start_index)
            && document.is_char_boundary(section.end_index);
        if !in_bounds {
            return Err(MergeError::OutOfBounds {
                section: section.name.clone(),
                start: section.start_index,
                end: section.end_index,
                len: document.len(),
            });
        }
    }

    // descending order: each range must end at or before the previous one starts
    for pair in ordered.windows(2) {
        let (right, left) = (&pair[0].section, &pair[1].section);
        if left.end_index > right.start_index {
            return Err(MergeError::Overlap {
                first: left.name.clone(),
                second: right.name.clone(),
            });
        }
    }

    let mut merged = document.to_string();
    for replacement in ordered {
        merged.replace_range(replacement.section.range(), &replacement.rendered());
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patch::locator::locate;
    use proptest::prelude::*;

    const DOC: &str = "<body>\n<!-- NAVBAR_START -->\n<nav>Home</nav>\n<!-- NAVBAR_END -->\n<!-- HERO_START -->\n<section class=\"hero\">Old</section>\n<!-- HERO_END -->\n<footer>Bye</footer>\n</body>";

    #[test]
    fn unchanged_content_round_trips_byte_identical() {
        let hero = locate(DOC, "hero").unwrap();
        let content = hero.content.clone();
        let merged = merge(DOC, &[Replacement::new(hero, content)]).unwrap();
        assert_eq!(merged, DOC);
    }

    #[test]
    fn marker_sections_are_rewrapped() {
        let hero = locate(DOC, "hero").unwrap();
        let merged = merge(
            DOC,
            &[Replacement::preserving_padding(hero, "<section class=\"hero\">New</section>")],
        )
        .unwrap();

        assert!(merged.contains(
            "<!-- HERO_START -->\n<section class=\"hero\">New</section>\n<!-- HERO_END -->"
        ));
        assert!(!merged.contains("Old"));

        let again = locate(&merged, "hero").unwrap();
        assert!(again.has_marker);
    }

    #[test]
    fn semantic_sections_are_substituted_directly() {
        let footer = locate(DOC, "footer").unwrap();
        assert!(!footer.has_marker);
        let merged = merge(DOC, &[Replacement::new(footer, "<footer>Later</footer>")]).unwrap();
        assert!(merged.ends_with("<footer>Later</footer>\n</body>"));
        assert!(!merged.contains("FOOTER_START"));
    }

    #[test]
    fn untouched_sections_stay_byte_identical() {
        let hero = locate(DOC, "hero").unwrap();
        let footer = locate(DOC, "footer").unwrap();
        let merged = merge(
            DOC,
            &[
                Replacement::new(hero, "\n<section class=\"hero\">A much longer hero body</section>\n"),
                Replacement::new(footer, "<footer>x</footer>"),
            ],
        )
        .unwrap();

        let navbar_before = locate(DOC, "navbar").unwrap();
        let navbar_after = locate(&merged, "navbar").unwrap();
        assert_eq!(navbar_before.content, navbar_after.content);
        assert_eq!(&merged[..navbar_after.end_index], &DOC[..navbar_before.end_index]);
    }

    #[test]
    fn overlapping_replacements_are_rejected() {
        let outer = Section {
            name: "outer".into(),
            content: String::new(),
            start_index: 0,
            end_index: 20,
            has_marker: false,
        };
        let inner = Section {
            name: "inner".into(),
            start_index: 5,
            end_index: 10,
            ..outer.clone()
        };
        let err = merge(DOC, &[Replacement::new(outer, "a"), Replacement::new(inner, "b")])
            .unwrap_err();
        assert!(matches!(err, MergeError::Overlap { .. }));
    }

    #[test]
    fn out_of_bounds_replacement_is_rejected() {
        let section = Section {
            name: "hero".into(),
            content: String::new(),
            start_index: 10,
            end_index: DOC.len() + 1,
            has_marker: false,
        };
        let err = merge(DOC, &[Replacement::new(section, "x")]).unwrap_err();
        assert!(matches!(err, MergeError::OutOfBounds { .. }));
    }

    #[test]
    fn empty_replacement_set_returns_document() {
        assert_eq!(merge(DOC, &[]).unwrap(), DOC);
    }

    #[test]
    fn preserving_padding_keeps_original_when_new_content_is_blank() {
        let hero = locate(DOC, "hero").unwrap();
        let original = hero.content.clone();
        let replacement = Replacement::preserving_padding(hero, "   \n ");
        assert_eq!(replacement.new_content, original);
    }

    proptest! {
        #[test]
        fn merge_is_order_independent(
            left in "[a-z<>/ ]{0,40}",
            right in "[a-z<>/ ]{0,40}",
        ) {
            let hero = locate(DOC, "hero").unwrap();
            let footer = locate(DOC, "footer").unwrap();
            let a = Replacement::new(hero, left);
            let b = Replacement::new(footer, right);

            let forward = merge(DOC, &[a.clone(), b.clone()]).unwrap();
            let backward = merge(DOC, &[b, a]).unwrap();
            prop_assert_eq!(forward, backward);
        }
    }
}
