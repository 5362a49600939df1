//! Section catalog.
//!
//! Everything that is specific to a section type lives in this table:
//! the words that make the classifier target it, and the ordered structural
//! patterns the locator falls back to when the section has no markers.
//! Supporting a new section type is a new entry here.

/// Structural pattern used by the semantic locator tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticPattern {
    /// First element with this tag name, e.g. `<footer>`.
    Element(&'static str),
    /// First element whose `class` or `id` value contains this needle.
    Attribute(&'static str),
}

/// Catalog entry for one canonical section.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    /// Canonical lowercase identifier.
    pub name: &'static str,
    /// Words or phrases that name this section explicitly.
    pub keywords: &'static [&'static str],
    /// Semantic patterns, highest priority first.
    pub patterns: &'static [SemanticPattern],
}

/// Secondary heuristic applied only when no explicit keyword matched.
#[derive(Debug, Clone, Copy)]
pub struct SectionHint {
    /// Section the hint points at.
    pub section: &'static str,
    /// Words that imply the section.
    pub words: &'static [&'static str],
    /// Words that veto the hint when also present.
    pub unless: &'static [&'static str],
}

use SemanticPattern::{Attribute, Element};

/// Canonical sections in document order.
pub static SECTION_CATALOG: &[SectionSpec] = &[
    SectionSpec {
        name: "navbar",
        keywords: &["navbar", "nav bar", "nav", "navigation", "menu", "header", "top bar"],
        patterns: &[Element("nav"), Element("header"), Attribute("navbar")],
    },
    SectionSpec {
        name: "hero",
        keywords: &["hero", "banner", "jumbotron", "splash", "above the fold"],
        patterns: &[Attribute("hero"), Attribute("banner"), Attribute("jumbotron")],
    },
    SectionSpec {
        name: "features",
        keywords: &["features", "feature", "benefits", "feature list"],
        patterns: &[Attribute("features"), Attribute("feature"), Attribute("benefits")],
    },
    SectionSpec {
        name: "about",
        keywords: &["about", "about us", "our story", "mission", "team"],
        patterns: &[Attribute("about"), Attribute("story"), Attribute("team")],
    },
    SectionSpec {
        name: "services",
        keywords: &["services", "service", "offerings"],
        patterns: &[Attribute("services"), Attribute("service"), Attribute("offerings")],
    },
    SectionSpec {
        name: "testimonials",
        keywords: &["testimonials", "testimonial", "reviews", "review", "quote", "quotes"],
        patterns: &[Attribute("testimonial"), Attribute("review"), Element("blockquote")],
    },
    SectionSpec {
        name: "pricing",
        keywords: &["pricing", "prices", "price", "plans"],
        patterns: &[Attribute("pricing"), Attribute("plans")],
    },
    SectionSpec {
        name: "gallery",
        keywords: &["gallery", "portfolio", "photos", "showcase"],
        patterns: &[Attribute("gallery"), Attribute("portfolio"), Attribute("showcase")],
    },
    SectionSpec {
        name: "faq",
        keywords: &["faq", "faqs", "questions"],
        patterns: &[Attribute("faq"), Attribute("questions")],
    },
    SectionSpec {
        name: "contact",
        keywords: &["contact", "contact form", "get in touch"],
        patterns: &[Attribute("contact"), Element("form")],
    },
    SectionSpec {
        name: "cta",
        keywords: &["cta", "call to action", "call-to-action", "signup", "sign up"],
        patterns: &[Attribute("cta"), Attribute("call-to-action"), Attribute("signup")],
    },
    SectionSpec {
        name: "footer",
        keywords: &["footer", "bottom of the page"],
        patterns: &[Element("footer"), Attribute("footer")],
    },
];

/// Secondary heuristics, tried in order when no keyword matched.
pub static SECTION_HINTS: &[SectionHint] = &[
    SectionHint {
        section: "navbar",
        words: &["logo", "brand", "branding"],
        unless: &[],
    },
    SectionHint {
        section: "hero",
        words: &["heading", "title", "headline", "tagline", "subtitle"],
        unless: &["footer"],
    },
    SectionHint {
        section: "footer",
        words: &["copyright", "legal", "social links", "social icons"],
        unless: &[],
    },
    SectionHint {
        section: "cta",
        words: &["get started", "button"],
        unless: &[],
    },
];

/// Looks up a catalog entry by canonical name.
pub fn section_spec(name: &str) -> Option<&'static SectionSpec> {
    SECTION_CATALOG.iter().find(|spec| spec.name == name)
}

/// Start sentinel for a marker-bound section.
pub fn start_marker(name: &str) -> String {
    format!("<!-- {}_START -->", name.to_uppercase())
}

/// End sentinel for a marker-bound section.
pub fn end_marker(name: &str) -> String {
    format!("<!-- {}_END -->", name.to_uppercase())
}
