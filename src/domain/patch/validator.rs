//! Structural sanity check for candidate documents.
//!
//! Not a parser. It answers one question: does this look like a complete,
//! well-formed page, or like something truncated or mangled by generation?
//! Every violation is collected so one call reports all problems.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::markup::{TagKind, TagScanner};

/// Trimmed documents shorter than this are treated as truncated.
pub const DEFAULT_MIN_DOCUMENT_LENGTH: usize = 200;

const DOCTYPE: &str = "<!doctype";

/// Regions whose text never declares a document type.
static INERT_REGION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>",
    )
    .expect("inert region pattern is valid")
});

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validator with a configurable minimum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentValidator {
    min_length: usize,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DOCUMENT_LENGTH)
    }
}

impl DocumentValidator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Runs every check against `document`.
    pub fn validate(&self, document: &str) -> ValidationResult {
        let lowered = document.to_ascii_lowercase();
        let mut errors = Vec::new();

        match INERT_REGION_RE.replace_all(&lowered, "").matches(DOCTYPE).count() {
            0 => errors.push("Missing DOCTYPE declaration".to_string()),
            1 => {}
            n => errors.push(format!("Multiple DOCTYPE declarations ({})", n)),
        }
        if !lowered.contains("<html") {
            errors.push("Missing <html> tag".to_string());
        }
        if !lowered.contains("<body") {
            errors.push("Missing <body> tag".to_string());
        }

        check_balance(document, &mut errors);

        let length = document.trim().chars().count();
        if length < self.min_length {
            errors.push(format!(
                "Document too short ({} characters, minimum {})",
                length, self.min_length
            ));
        }

        ValidationResult::from_errors(errors)
    }
}

/// Validates with the default minimum length.
pub fn validate(document: &str) -> ValidationResult {
    DocumentValidator::default().validate(document)
}

/// Single linear pass with a stack of open element names.
fn check_balance(document: &str, errors: &mut Vec<String>) {
    let mut stack: Vec<String> = Vec::new();

    for tag in TagScanner::new(document) {
        if tag.is_void() {
            continue;
        }
        match tag.kind {
            TagKind::SelfClosing => {}
            TagKind::Open => stack.push(tag.name),
            TagKind::Close => match stack.last() {
                Some(top) if *top == tag.name => {
                    stack.pop();
                }
                // a stray close tag leaves the stack alone so one typo does
                // not cascade into errors for every enclosing element
                Some(top) => errors.push(format!(
                    "Mismatched closing tag </{}>: expected </{}>",
                    tag.name, top
                )),
                None => errors.push(format!("Unexpected closing tag </{}>", tag.name)),
            },
        }
    }

    if !stack.is_empty() {
        errors.push(format!("Unclosed tags: {}", stack.join(", ")));
    }
}
