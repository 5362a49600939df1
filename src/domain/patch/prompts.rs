//! Prompt text for each patch tier.
//!
//! Every builder returns `(system_instruction, user_message)`.

use super::section::Section;

/// A single-section rewrite. Only the section's own content is sent.
pub fn section_prompt(section: &Section, instruction: &str) -> (String, String) {
    let system = format!(
        "You are an expert web developer editing one section of an existing HTML page.\n\n\
        Section: {}\n\n\
        Rules:\n\
        - Return ONLY the updated HTML for this section, nothing else.\n\
        - Do not return a full document, <html>, <head> or <body> tags.\n\
        - Do not include <!-- {}_START --> or <!-- {}_END --> comments.\n\
        - Keep existing classes, ids and structure unless the request requires changing them.\n\
        - No explanations and no markdown code fences.",
        section.name,
        section.name.to_uppercase(),
        section.name.to_uppercase(),
    );

    let user = format!(
        "Current {} section:\n\n{}\n\nRequested change:\n{}",
        section.name,
        section.content.trim(),
        instruction.trim()
    );

    (system, user)
}

/// A whole-document rewrite that must keep unrelated content intact.
pub fn cross_section_prompt(document: &str, instruction: &str) -> (String, String) {
    let system = "You are an expert web developer revising an existing HTML page.\n\n\
        Rules:\n\
        - Apply the requested change wherever it is relevant across the page.\n\
        - Keep every other part of the page exactly as it is, including section comments such as <!-- HERO_START -->.\n\
        - Return the COMPLETE updated document, starting with <!DOCTYPE html>.\n\
        - Never abbreviate or omit content with placeholders.\n\
        - No explanations and no markdown code fences."
        .to_string();

    let user = format!(
        "Current document:\n\n{}\n\nRequested change:\n{}",
        document,
        instruction.trim()
    );

    (system, user)
}

/// Regenerates the page from the current document and the instruction.
pub fn full_regen_prompt(document: &str, instruction: &str) -> (String, String) {
    let system = "You are an expert web developer producing a complete, self-contained HTML page.\n\n\
        Rules:\n\
        - Use the current page as the starting point and apply the requested change, \
        including adding, removing or reordering sections when asked.\n\
        - Wrap each top-level section in comments of the form <!-- NAME_START --> and <!-- NAME_END -->, \
        where NAME is the uppercased section name (for example HERO, NAVBAR, FOOTER).\n\
        - Return the COMPLETE document, starting with <!DOCTYPE html>.\n\
        - No explanations and no markdown code fences."
        .to_string();

    let user = format!(
        "Current document:\n\n{}\n\nRequested change:\n{}",
        document,
        instruction.trim()
    );

    (system, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Section {
        Section {
            name: "hero".to_string(),
            content: "\n<section class=\"hero\">Hi</section>\n".to_string(),
            start_index: 0,
            end_index: 10,
            has_marker: true,
        }
    }

    #[test]
    fn section_prompt_contains_only_section_content() {
        let (system, user) = section_prompt(&hero(), "make it blue");
        assert!(system.contains("Section: hero"));
        assert!(system.contains("HERO_START"));
        assert!(user.contains("<section class=\"hero\">Hi</section>"));
        assert!(user.ends_with("make it blue"));
    }

    #[test]
    fn document_prompts_embed_document() {
        let doc = "<!DOCTYPE html><html><body>x</body></html>";
        let (system, user) = cross_section_prompt(doc, "every heading red");
        assert!(system.contains("COMPLETE"));
        assert!(user.contains(doc));

        let (system, user) = full_regen_prompt(doc, "add pricing");
        assert!(system.contains("NAME_START"));
        assert!(user.contains("add pricing"));
    }
}
