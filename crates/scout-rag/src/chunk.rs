//! Paragraph-preferring fixed-size chunking for the RAG corpus (spec §4.8,
//! design target 1500 characters).
//!
//! Grounded on `riptide-html::processor::chunk_content_impl`'s `Paragraph`
//! variant: accumulate whole paragraphs until the target size would be
//! exceeded, then flush, so a chunk boundary never lands inside one.

pub const TARGET_CHUNK_SIZE: usize = 1500;

pub fn chunk_corpus(text: &str, target_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if paragraph.trim().is_empty() {
            continue;
        }
        if !current.is_empty() && current.chars().count() + paragraph.chars().count() + 2 > target_size {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        if paragraph.chars().count() > target_size {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_oversized(paragraph, target_size));
            continue;
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn split_oversized(paragraph: &str, target_size: usize) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    chars.chunks(target_size).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_paragraphs_whole_when_under_target() {
        let text = "para one.\n\npara two.\n\npara three.";
        let chunks = chunk_corpus(text, 1500);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn splits_at_paragraph_boundary_when_over_target() {
        let a = "a".repeat(900);
        let b = "b".repeat(900);
        let text = format!("{a}\n\n{b}");
        let chunks = chunk_corpus(&text, 1500);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].chars().all(|c| c == 'a'));
        assert!(chunks[1].chars().all(|c| c == 'b'));
    }

    #[test]
    fn oversized_single_paragraph_is_hard_split() {
        let text = "z".repeat(4000);
        let chunks = chunk_corpus(&text, 1500);
        assert_eq!(chunks.len(), 3);
    }
}
