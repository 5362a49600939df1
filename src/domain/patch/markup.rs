//! Linear tag scanner over raw HTML text.
//!
//! Not a parser. It walks the document once, left to right, yielding open,
//! close and self-closing tags with their byte ranges. Comments and `<!...>`
//! declarations are skipped, as are the raw-text bodies of `<script>` and
//! `<style>`. The regex engine guarantees linear time (no backtracking).

use once_cell::sync::Lazy;
use regex::Regex;

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose body is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<![^>]*>|<(/)?([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .expect("tag pattern is valid")
});

static CLASS_OR_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(?:class|id)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern is valid")
});

/// Kind of tag found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
}

/// A single tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Lowercased tag name.
    pub name: String,
    pub kind: TagKind,
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    /// Raw attribute text between the name and `>`.
    pub attributes: &'a str,
}

impl Tag<'_> {
    /// True for elements exempt from open/close balancing.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// True if the `class` or `id` attribute contains `needle` (case-insensitive).
    pub fn class_or_id_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        CLASS_OR_ID_RE.captures_iter(self.attributes).any(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .is_some_and(|value| value.as_str().to_lowercase().contains(&needle))
        })
    }
}

/// Iterator over the tags of a document.
#[derive(Debug, Clone)]
pub struct TagScanner<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    /// Scans from the beginning of the document.
    pub fn new(html: &'a str) -> Self {
        Self::starting_at(html, 0)
    }

    /// Scans from a byte offset (clamped to the document length).
    pub fn starting_at(html: &'a str, pos: usize) -> Self {
        Self {
            html,
            pos: pos.min(html.len()),
        }
    }

    /// Moves past the raw-text body of `name`, stopping at its close tag.
    fn skip_raw_text(&mut self, name: &str) {
        let closing = format!("</{}", name);
        let rest = self.html[self.pos..].to_ascii_lowercase();
        self.pos = match rest.find(&closing) {
            Some(offset) => self.pos + offset,
            None => self.html.len(),
        };
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = TAG_RE.captures_at(self.html, self.pos)?;
            let whole = caps.get(0)?;
            self.pos = whole.end();

            // comment or declaration
            let Some(name) = caps.get(2) else {
                continue;
            };

            let name = name.as_str().to_ascii_lowercase();
            let attributes = caps.get(3).map_or("", |m| m.as_str());
            let kind = if caps.get(1).is_some() {
                TagKind::Close
            } else if attributes.trim_end().ends_with('/') {
                TagKind::SelfClosing
            } else {
                TagKind::Open
            };

            if kind == TagKind::Open && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                self.skip_raw_text(&name);
            }

            return Some(Tag {
                name,
                kind,
                start: whole.start(),
                end: whole.end(),
                attributes,
            });
        }
    }
}

/// Finds the end offset of the element opened by `open`.
///
/// Counts nested open/close tags of the same name and returns the offset just
/// past the close tag that brings the depth back to zero, or `None` when the
/// element is never closed.
pub fn find_balanced_end(html: &str, open: &Tag<'_>) -> Option<usize> {
    if open.kind != TagKind::Open {
        return None;
    }

    let mut depth = 1usize;
    for tag in TagScanner::starting_at(html, open.end) {
        if tag.name != open.name {
            continue;
        }
        match tag.kind {
            TagKind::Open => depth += 1,
            TagKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return Some(tag.end);
                }
            }
            TagKind::SelfClosing => {}
        }
    }
    None
}
