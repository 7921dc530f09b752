//! Output formatting: JSON for machine consumption, plain text for a
//! terminal. Grounded on `riptide-cli`'s output module, trimmed to the two
//! formats this pipeline actually needs.

use anyhow::{anyhow, Result};
use scout_types::{Report, SourceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(anyhow!("invalid output format: {other}")),
        }
    }
}

pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_report_text(report)),
    }
}

fn render_report_text(report: &Report) -> String {
    let mut out = String::new();

    if report.needs_clarification {
        out.push_str("Clarification needed:\n");
        out.push_str(report.clarification_question.as_deref().unwrap_or(""));
        out.push('\n');
        return out;
    }

    if !report.success {
        out.push_str("Run failed");
        if let Some(error) = &report.error {
            out.push_str(&format!(": {error}"));
        }
        out.push('\n');
        return out;
    }

    out.push_str(&report.text);
    out.push_str("\n\n");
    out.push_str(&format!("--- {} source(s), {} ms", report.sources_used.len(), report.latency_ms));
    if report.fallback_used {
        out.push_str(", fell back to classic synthesis");
    }
    out.push_str(" ---\n");

    for source in &report.sources_used {
        let status = match &source.status {
            SourceStatus::Extracted => "ok".to_string(),
            SourceStatus::Failed { error } => format!("failed: {error}"),
            SourceStatus::Pending | SourceStatus::InProgress => "incomplete".to_string(),
        };
        out.push_str(&format!("  [{:?}] {} — {status}\n", source.kind, source.origin));
    }

    if !report.citations.is_empty() {
        out.push_str("\nCitations:\n");
        for citation in &report.citations {
            out.push_str(&format!("  - {} ({})\n", citation.title, citation.kind));
        }
    }

    out
}

pub fn render_answer(answer: &str, method: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({ "answer": answer, "method": method }))?),
        OutputFormat::Text => Ok(format!("{answer}\n\n--- method: {method} ---\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_unknown_format() {
        assert!(OutputFormat::parse("yaml").is_err());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
    }

    #[test]
    fn text_report_surfaces_clarification_question() {
        let report = Report::needs_clarification(scout_types::Mode::Deep, "Which market segment?");
        let text = render_report_text(&report);
        assert!(text.contains("Which market segment?"));
    }
}
