//! Extraction of usable content from raw generation responses.
//!
//! Generation backends do not reliably follow output instructions: a section
//! request may come back fenced in markdown, wrapped in its own sentinels, or
//! as an entire document.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::catalog::{end_marker, start_marker};
use super::locator::locate_by_markers;

static FENCED_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?sm)^[ \t]*```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?[ \t]*```")
        .expect("fence pattern is valid")
});

static DOCTYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!doctype").expect("doctype pattern is valid"));

/// Returns the body of the first markdown code block in the response.
///
/// Chatty backends wrap the block in prose ("Sure! Here is..."), so the
/// fence may open anywhere as long as it starts a line. Text without a
/// fenced block is only trimmed.
pub fn strip_code_fences(text: &str) -> String {
    match FENCED_BLOCK_RE.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// True if `text` contains a DOCTYPE declaration anywhere.
pub fn is_full_document(text: &str) -> bool {
    DOCTYPE_RE.is_match(text)
}

/// Slice of `text` from its first DOCTYPE onward, dropping any preamble.
fn from_doctype(text: &str) -> &str {
    match DOCTYPE_RE.find(text) {
        Some(found) => &text[found.start()..],
        None => text,
    }
}

/// Unfenced document text from a whole-document response.
pub fn document_from_response(text: &str) -> String {
    let cleaned = strip_code_fences(text);
    from_doctype(&cleaned).trim().to_string()
}

/// Extracts the content for `section_name` from a raw section response.
///
/// Full-document responses are searched for the section's markers; when
/// that fails the document is used as-is rather than failing the patch.
pub fn extract_content_from_response(text: &str, section_name: &str) -> String {
    let cleaned = strip_code_fences(text);

    if is_full_document(&cleaned) {
        let document = from_doctype(&cleaned);
        return match locate_by_markers(document, section_name) {
            Some(section) => section.content.trim().to_string(),
            None => {
                warn!(
                    section = %section_name,
                    "Response is a full document without section markers; using it verbatim"
                );
                document.trim().to_string()
            }
        };
    }

    // the section came back with its own sentinels
    let start = start_marker(section_name);
    let end = end_marker(section_name);
    if cleaned.len() >= start.len() + end.len()
        && cleaned.starts_with(&start)
        && cleaned.ends_with(&end)
    {
        return cleaned[start.len()..cleaned.len() - end.len()].trim().to_string();
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fenced_block_with_language() {
        let text = "```html\n<section class=\"hero\">Hi</section>\n```";
        assert_eq!(strip_code_fences(text), "<section class=\"hero\">Hi</section>");
    }

    #[test]
    fn strips_fenced_block_without_language() {
        let text = "  ```\n<p>x</p>\n```\n";
        assert_eq!(strip_code_fences(text), "<p>x</p>");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("\n  <p>x</p>  \n"), "<p>x</p>");
    }

    #[test]
    fn inner_fences_are_left_alone() {
        let text = "<p>see ```code```</p>";
        assert_eq!(strip_code_fences(text), text);
    }

    #[test]
    fn plain_section_response_is_used_directly() {
        let content = extract_content_from_response("<section class=\"hero\">New</section>", "hero");
        assert_eq!(content, "<section class=\"hero\">New</section>");
    }

    #[test]
    fn full_document_response_is_narrowed_to_marked_section() {
        let response = "<!DOCTYPE html><html><body><!-- NAVBAR_START --><nav>n</nav><!-- NAVBAR_END -->\n<!-- HERO_START -->\n<section>New hero</section>\n<!-- HERO_END --></body></html>";
        assert_eq!(
            extract_content_from_response(response, "hero"),
            "<section>New hero</section>"
        );
    }

    #[test]
    fn full_document_without_markers_is_used_verbatim() {
        let response = "```html\n<!DOCTYPE html><html><body><section class=\"hero\">x</section></body></html>\n```";
        assert_eq!(
            extract_content_from_response(response, "hero"),
            "<!DOCTYPE html><html><body><section class=\"hero\">x</section></body></html>"
        );
    }

    #[test]
    fn echoed_markers_are_unwrapped() {
        let response = "<!-- FOOTER_START -->\n<footer>f</footer>\n<!-- FOOTER_END -->";
        assert_eq!(extract_content_from_response(response, "footer"), "<footer>f</footer>");
    }

    #[test]
    fn doctype_detection_is_case_insensitive() {
        assert!(is_full_document("  <!doctype html><html></html>"));
        assert!(!is_full_document("<section>no doctype</section>"));
    }

    #[test]
    fn fenced_block_after_prose_is_extracted() {
        let text = "Sure! Here is the updated hero:\n```html\n<section class=\"hero\">Hi</section>\n```\nLet me know if you need more.";
        assert_eq!(strip_code_fences(text), "<section class=\"hero\">Hi</section>");
    }

    #[test]
    fn first_of_several_fenced_blocks_wins() {
        let text = "Here:\n```html\n<p>one</p>\n```\nOr:\n```html\n<p>two</p>\n```";
        assert_eq!(strip_code_fences(text), "<p>one</p>");
    }

    #[test]
    fn doctype_after_long_preamble_is_detected() {
        let text = "I've updated the hero background as requested, keeping every other part of the page exactly as it was before. Here is the complete page:\n<!DOCTYPE html><html></html>";
        assert!(is_full_document(text));
    }

    #[test]
    fn full_document_after_preamble_is_narrowed_to_marked_section() {
        let response = "I've updated the hero background as requested, keeping every other part of the page exactly as it was before. Here is the complete page:\n<!DOCTYPE html><html><body><!-- HERO_START --><section>Blue hero</section><!-- HERO_END --></body></html>";
        assert_eq!(
            extract_content_from_response(response, "hero"),
            "<section>Blue hero</section>"
        );
    }

    #[test]
    fn unmarked_full_document_drops_preamble() {
        let response = "Here is the complete page:\n<!DOCTYPE html><html><body><p>x</p></body></html>";
        assert_eq!(
            extract_content_from_response(response, "hero"),
            "<!DOCTYPE html><html><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn document_response_loses_fence_and_preamble() {
        let response = "Sure, here you go:\n```html\n<!DOCTYPE html>\n<html><body></body></html>\n```";
        assert_eq!(
            document_from_response(response),
            "<!DOCTYPE html>\n<html><body></body></html>"
        );
    }
}
