//! # Scout Docs
//!
//! Converts a document byte-stream into UTF-8 text, dispatching on filename
//! suffix: PDF via `lopdf`, DOCX via `docx-rs`, TXT/MD via UTF-8 decoding
//! with a Latin-1 fallback (spec §4.5, C5).
//!
//! Grounded on `riptide-pdf`'s page-concatenation extraction shape; the
//! teacher has no Office-Open-XML crate, so `docx-rs` is imported fresh for
//! that branch (see DESIGN.md).

mod error;

pub use error::unsupported_file_type;

use scout_types::PipelineError;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub byte_count: usize,
    pub extracted_length: usize,
}

/// Extract text from `bytes`, dispatching on `filename`'s suffix.
#[instrument(skip(bytes), fields(filename, byte_count = bytes.len()))]
pub fn extract_document(filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, PipelineError> {
    let suffix = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();

    let text = match suffix.as_str() {
        "pdf" => extract_pdf(bytes)?,
        "docx" => extract_docx(bytes)?,
        "txt" | "md" => extract_text(bytes),
        _ => return Err(error::unsupported_file_type(&suffix)),
    };

    Ok(ExtractedDocument {
        extracted_length: text.chars().count(),
        byte_count: bytes.len(),
        text,
    })
}

fn extract_pdf(bytes: &[u8]) -> Result<String, PipelineError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| error::malformed("pdf", e))?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut text = String::new();
    for page in page_numbers {
        match doc.extract_text(&[page]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "failed to extract text from pdf page, skipping");
            }
        }
    }
    Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, PipelineError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| error::malformed("docx", e))?;
    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for run_child in &paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = run_child {
                    for text_child in &run.children {
                        if let docx_rs::RunChild::Text(t) = text_child {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }
    Ok(paragraphs.join("\n"))
}

fn extract_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_decodes_utf8() {
        let doc = extract_document("notes.txt", "hello world".as_bytes()).unwrap();
        assert_eq!(doc.text, "hello world");
        assert_eq!(doc.byte_count, 11);
        assert_eq!(doc.extracted_length, 11);
    }

    #[test]
    fn md_falls_back_to_latin1_on_invalid_utf8() {
        let bytes = vec![0xe9, b'c', b'r', b'i', b't']; // Latin-1 "écrit"
        let doc = extract_document("notes.md", &bytes).unwrap();
        assert_eq!(doc.text, "\u{e9}crit");
    }

    #[test]
    fn unsupported_suffix_rejected() {
        let err = extract_document("archive.zip", b"PK").unwrap_err();
        assert_eq!(err.kind, scout_types::ErrorKind::UnsupportedFileType("zip".to_string()));
    }

    #[test]
    fn malformed_pdf_is_rejected() {
        let err = extract_document("broken.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err.kind, scout_types::ErrorKind::UnsupportedFileType(_)));
    }
}
