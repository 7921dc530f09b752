//! Bounded summary rendering for prompt injection (spec §4.6 "Summary
//! rendering"): group by class, cap entities per class and source names
//! shown, optional confidence floor, hard total-length budget.

use scout_types::{Entity, EntityClass, Source};
use std::collections::HashMap;

const MAX_PER_CLASS: usize = 5;
const MAX_SOURCE_NAMES: usize = 10;
const MAX_TOTAL_CHARS: usize = 2000;
const TRUNCATION_MARKER: &str = "[truncated]";

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    pub min_confidence: Option<f32>,
}

/// Render a bounded text summary of `entities`, with `sources` supplying
/// display names keyed by `SourceId` for the top-N-by-count source list.
pub fn render_summary(entities: &[Entity], sources: &[Source], opts: SummaryOptions) -> String {
    let filtered: Vec<&Entity> = entities
        .iter()
        .filter(|e| opts.min_confidence.map(|min| e.confidence.unwrap_or(1.0) >= min).unwrap_or(true))
        .collect();

    let mut by_class: HashMap<EntityClass, Vec<&Entity>> = HashMap::new();
    for entity in &filtered {
        by_class.entry(entity.class).or_default().push(entity);
    }

    let mut out = String::new();

    for class in EntityClass::ALL {
        let Some(group) = by_class.get(&class) else { continue };
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("{class}:\n"));
        for entity in group.iter().take(MAX_PER_CLASS) {
            out.push_str(&format!("  - {}\n", entity.text));
        }
        if group.len() > MAX_PER_CLASS {
            out.push_str(&format!("  ... and {} more\n", group.len() - MAX_PER_CLASS));
        }
    }

    let source_names = top_source_names(&filtered, sources);
    if !source_names.is_empty() {
        out.push_str("\nSources:\n");
        for name in source_names {
            out.push_str(&format!("  - {name}\n"));
        }
    }

    if out.chars().count() > MAX_TOTAL_CHARS {
        let budget = MAX_TOTAL_CHARS.saturating_sub(TRUNCATION_MARKER.len());
        let truncated: String = out.chars().take(budget).collect();
        out = format!("{truncated}{TRUNCATION_MARKER}");
    }

    out
}

fn top_source_names(entities: &[&Entity], sources: &[Source]) -> Vec<String> {
    let mut counts: HashMap<_, usize> = HashMap::new();
    for e in entities {
        *counts.entry(e.source_id).or_insert(0) += 1;
    }

    let mut names: Vec<(String, usize)> = counts
        .into_iter()
        .filter_map(|(id, count)| sources.iter().find(|s| s.id == id).map(|s| (s.origin.clone(), count)))
        .collect();
    names.sort_by(|a, b| b.1.cmp(&a.1));
    names.truncate(MAX_SOURCE_NAMES);
    names.into_iter().map(|(name, _)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_types::{Source, SourceKind};
    use std::collections::HashMap as Map;

    fn entity(class: EntityClass, text: &str, source_id: scout_types::SourceId) -> Entity {
        Entity { class, text: text.to_string(), attributes: Map::new(), source_start: 0, source_end: text.len(), source_id, confidence: None }
    }

    #[test]
    fn groups_by_class_and_caps_per_class() {
        let source = Source::new(SourceKind::Web, "https://acme.example".to_string());
        let entities: Vec<Entity> = (0..8).map(|i| entity(EntityClass::Person, &format!("Person {i}"), source.id)).collect();
        let summary = render_summary(&entities, &[source], SummaryOptions::default());
        assert!(summary.contains("... and 3 more"));
    }

    #[test]
    fn respects_min_confidence_filter() {
        let source = Source::new(SourceKind::Web, "https://acme.example".to_string());
        let mut e = entity(EntityClass::Metric, "40% growth", source.id);
        e.confidence = Some(0.2);
        let summary = render_summary(&[e], &[source], SummaryOptions { min_confidence: Some(0.5) });
        assert!(!summary.contains("40% growth"));
    }

    #[test]
    fn truncates_when_over_budget() {
        let source = Source::new(SourceKind::Web, "https://acme.example".to_string());
        let big_text = "x".repeat(500);
        let entities: Vec<Entity> = (0..5).map(|_| entity(EntityClass::RiskFactor, &big_text, source.id)).collect();
        let summary = render_summary(&entities, &[source], SummaryOptions::default());
        assert!(summary.ends_with(TRUNCATION_MARKER));
        assert!(summary.chars().count() <= MAX_TOTAL_CHARS);
    }
}
