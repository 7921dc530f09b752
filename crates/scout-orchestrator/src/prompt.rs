//! Classic-mode prompt composition (spec §4.10 Classic mode, step 5) and
//! the deep-mode input-text assembly (step 3 of Deep mode).
//!
//! Pure string building kept out of the orchestration loop so the
//! section-ordering and per-source truncation invariants are directly
//! testable.

pub const SYSTEM_INSTRUCTION: &str = "You are a careful due-diligence research analyst. Synthesize the \
provided sources into a clear, well-organized markdown report. Cite sources by name where you draw on \
them, and call out explicitly when requested information is missing or a source was unavailable.";

pub const DOCUMENT_BUDGET: usize = 3000;
pub const WEB_BUDGET: usize = 2000;
pub const DECK_BUDGET: usize = 3000;

pub const TRUNCATION_MARKER: &str = "\n[...truncated...]";

/// `(origin, text)` pairs in submission order (spec §4.10 "Determinism &
/// ordering").
pub type NamedSection = (String, String);

pub struct ClassicPromptInput<'a> {
    pub query: &'a str,
    pub documents: &'a [NamedSection],
    pub web: &'a [NamedSection],
    pub deck: Option<&'a NamedSection>,
    pub entity_summary: Option<&'a str>,
    pub unavailable: &'a [String],
}

pub fn compose_classic_prompt(input: &ClassicPromptInput) -> String {
    let mut out = String::new();
    out.push_str("# Research Query\n");
    out.push_str(input.query);
    out.push_str("\n\n");

    push_section(&mut out, "Documents", input.documents, DOCUMENT_BUDGET);
    push_section(&mut out, "Scraped Web", input.web, WEB_BUDGET);
    if let Some(deck) = input.deck {
        push_section(&mut out, "Deck", std::slice::from_ref(deck), DECK_BUDGET);
    }

    if let Some(summary) = input.entity_summary {
        out.push_str("## Extracted Entities\n");
        out.push_str(summary);
        out.push_str("\n\n");
    }

    if !input.unavailable.is_empty() {
        out.push_str("## Unavailable Sources\n");
        out.push_str("Note in the report that these sources could not be retrieved:\n");
        for note in input.unavailable {
            out.push_str("- ");
            out.push_str(note);
            out.push('\n');
        }
        out.push_str("\n\n");
    }

    out
}

fn push_section(out: &mut String, heading: &str, sections: &[NamedSection], budget: usize) {
    if sections.is_empty() {
        return;
    }
    out.push_str(&format!("## {heading}\n"));
    for (origin, text) in sections {
        out.push_str(&format!("### {origin}\n"));
        out.push_str(&truncate_chars(text, budget));
        out.push_str("\n\n");
    }
}

fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let truncated: String = text.chars().take(budget).collect();
    format!("{truncated}{TRUNCATION_MARKER}")
}

/// Deep mode's single input text (spec §4.10 Deep mode, step 3): the query,
/// a fixed research-requirements directive, truncated reference materials,
/// then the entity summary if any.
pub fn compose_deep_input(
    query: &str,
    documents: &[NamedSection],
    web: &[NamedSection],
    deck: Option<&NamedSection>,
    entity_summary: Option<&str>,
) -> String {
    let mut out = String::new();
    out.push_str("# Research Query\n");
    out.push_str(query);
    out.push_str("\n\n");
    out.push_str(
        "## Research Requirements\nProvide comprehensive coverage of the query. Aim for a substantial, \
well-structured report with explicit citations to any reference material below.\n\n",
    );

    push_section(&mut out, "Reference Documents", documents, DOCUMENT_BUDGET);
    push_section(&mut out, "Reference Web Pages", web, WEB_BUDGET);
    if let Some(deck) = deck {
        push_section(&mut out, "Reference Deck", std::slice::from_ref(deck), DECK_BUDGET);
    }

    if let Some(summary) = entity_summary {
        out.push_str("## Extracted Entities\n");
        out.push_str(summary);
        out.push_str("\n\n");
    }

    out
}

/// Re-run input for `continue(clarification_response)` (spec §4.10 Deep
/// mode, step 5): the clarification answer folded into the query, with the
/// entity summary prepended so the engine does not re-extract.
pub fn compose_clarification_followup(original_query: &str, clarification_response: &str, entity_summary: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(summary) = entity_summary {
        out.push_str("## Previously Extracted Entities\n");
        out.push_str(summary);
        out.push_str("\n\n");
    }
    out.push_str("# Research Query\n");
    out.push_str(original_query);
    out.push_str("\n\n## Clarification\n");
    out.push_str(clarification_response);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_fixed_order() {
        let documents = vec![("doc1".to_string(), "alpha".to_string())];
        let web = vec![("page1".to_string(), "beta".to_string())];
        let input = ClassicPromptInput { query: "Evaluate Acme", documents: &documents, web: &web, deck: None, entity_summary: None, unavailable: &[] };
        let prompt = compose_classic_prompt(&input);

        let doc_pos = prompt.find("## Documents").unwrap();
        let web_pos = prompt.find("## Scraped Web").unwrap();
        assert!(doc_pos < web_pos);
    }

    #[test]
    fn truncates_over_budget_sections() {
        let long = "x".repeat(DOCUMENT_BUDGET + 500);
        let documents = vec![("doc1".to_string(), long)];
        let input = ClassicPromptInput { query: "q", documents: &documents, web: &[], deck: None, entity_summary: None, unavailable: &[] };
        let prompt = compose_classic_prompt(&input);
        assert!(prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn omits_empty_sections_entirely() {
        let input = ClassicPromptInput { query: "q", documents: &[], web: &[], deck: None, entity_summary: None, unavailable: &[] };
        let prompt = compose_classic_prompt(&input);
        assert!(!prompt.contains("## Documents"));
    }

    #[test]
    fn preserves_submission_order_within_a_section() {
        let documents = vec![("doc1".to_string(), "one".to_string()), ("doc2".to_string(), "two".to_string())];
        let input = ClassicPromptInput { query: "q", documents: &documents, web: &[], deck: None, entity_summary: None, unavailable: &[] };
        let prompt = compose_classic_prompt(&input);
        assert!(prompt.find("doc1").unwrap() < prompt.find("doc2").unwrap());
    }

    #[test]
    fn unavailable_sources_are_noted_when_present() {
        let unavailable = vec!["deck (https://docsend.example/view/abc): access denied".to_string()];
        let input = ClassicPromptInput { query: "q", documents: &[], web: &[], deck: None, entity_summary: None, unavailable: &unavailable };
        let prompt = compose_classic_prompt(&input);
        assert!(prompt.contains("## Unavailable Sources"));
        assert!(prompt.contains("access denied"));
    }

    #[test]
    fn clarification_followup_prepends_entity_summary() {
        let followup = compose_clarification_followup("Analyze Foo", "Focus on tokenomics", Some("Acme Corp (organization)"));
        assert!(followup.find("Previously Extracted Entities").unwrap() < followup.find("Clarification").unwrap());
        assert!(followup.contains("Focus on tokenomics"));
    }
}
