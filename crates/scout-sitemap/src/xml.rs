//! Namespace-stripped, tag-stack-aware sitemap XML parsing.
//!
//! Ported from `parse_xml_sitemap` in the original scanner: strip the two
//! well-known sitemap XML namespace declarations by literal string
//! replacement before parsing (real-world sitemaps vary capitalization and
//! closing-slash placement enough that a strict namespace-aware reader
//! rejects documents a browser happily renders), then walk the event stream
//! tracking which enclosing tag we're under so a bare `<loc>` is attributed
//! to either a `<sitemap>` (nested index entry) or a `<url>` (page entry).

use xml::reader::{EventReader, XmlEvent};

const NAMESPACE_DECLS: [&str; 2] = [
    "xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"",
    "xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\"",
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedSitemap {
    /// `<loc>` entries found under `<sitemap>` inside a `<sitemapindex>`.
    pub child_sitemaps: Vec<String>,
    /// `<loc>` entries found under `<url>` inside a `<urlset>`.
    pub page_urls: Vec<String>,
}

fn strip_namespaces(body: &str) -> String {
    let mut out = body.to_string();
    for decl in NAMESPACE_DECLS {
        out = out.replace(decl, "");
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Enclosing {
    None,
    Sitemap,
    Url,
}

pub fn parse_sitemap_xml(body: &str) -> ParsedSitemap {
    let cleaned = strip_namespaces(body);
    let reader = EventReader::from_str(&cleaned);
    let mut result = ParsedSitemap::default();
    let mut stack: Vec<Enclosing> = Vec::new();
    let mut in_loc = false;
    let mut loc_text = String::new();

    for event in reader {
        let event = match event {
            Ok(e) => e,
            Err(_) => break,
        };
        match event {
            XmlEvent::StartElement { name, .. } => {
                let local = name.local_name.as_str();
                match local {
                    "sitemap" => stack.push(Enclosing::Sitemap),
                    "url" => stack.push(Enclosing::Url),
                    "loc" => {
                        in_loc = true;
                        loc_text.clear();
                    }
                    _ => {}
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if in_loc {
                    loc_text.push_str(&text);
                }
            }
            XmlEvent::EndElement { name } => {
                let local = name.local_name.as_str();
                match local {
                    "sitemap" | "url" => {
                        stack.pop();
                    }
                    "loc" => {
                        in_loc = false;
                        let trimmed = loc_text.trim().to_string();
                        if !trimmed.is_empty() {
                            match stack.last().copied().unwrap_or(Enclosing::None) {
                                Enclosing::Sitemap => result.child_sitemaps.push(trimmed),
                                Enclosing::Url => result.page_urls.push(trimmed),
                                Enclosing::None => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urlset() {
        let body = r#"<?xml version="1.0"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>https://acme.example/a</loc></url>
                <url><loc>https://acme.example/b</loc></url>
            </urlset>"#;
        let parsed = parse_sitemap_xml(body);
        assert_eq!(parsed.page_urls, vec!["https://acme.example/a", "https://acme.example/b"]);
        assert!(parsed.child_sitemaps.is_empty());
    }

    #[test]
    fn parses_sitemapindex() {
        let body = r#"<?xml version="1.0"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>https://acme.example/sitemap-a.xml</loc></sitemap>
                <sitemap><loc>https://acme.example/sitemap-b.xml</loc></sitemap>
            </sitemapindex>"#;
        let parsed = parse_sitemap_xml(body);
        assert!(parsed.page_urls.is_empty());
        assert_eq!(parsed.child_sitemaps.len(), 2);
    }

    #[test]
    fn malformed_xml_yields_empty_result_not_panic() {
        let parsed = parse_sitemap_xml("<urlset><url><loc>unterminated");
        assert!(parsed.page_urls.is_empty());
        assert!(parsed.child_sitemaps.is_empty());
    }
}
