//! Chunking: slice text into overlapping windows, preferring a paragraph
//! break near the end of each window (§4.6).
//!
//! Grounded on `riptide-html::processor::chunk_content_impl`'s `FixedSize`
//! variant, extended with a paragraph-break search. Offsets are character
//! offsets, not byte offsets, so they stay valid across the full range of
//! UTF-8 input without landing mid-codepoint.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len == 0 || max_chunk_size == 0 {
        return Vec::new();
    }
    let overlap = max_chunk_size.saturating_sub(1).min(200);

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < len {
        let mut end = (start + max_chunk_size).min(len);

        if end < len {
            if let Some(candidate) = find_paragraph_break(&chars, start, end, max_chunk_size) {
                end = candidate;
            }
        }

        let slice: String = chars[start..end].iter().collect();
        chunks.push(Chunk { text: slice, start, end });

        if end >= len {
            break;
        }

        start = if overlap < (end - start) { end - overlap } else { end };
    }

    chunks
}

/// Search the final 10% of the window `[start, end)` for the last
/// paragraph break (`\n\n`), returning the char index just after it.
fn find_paragraph_break(chars: &[char], start: usize, end: usize, max_chunk_size: usize) -> Option<usize> {
    let window_start = (start + (max_chunk_size * 9 / 10)).clamp(start, end);
    let mut last_break = None;
    let mut i = window_start;
    while i + 1 < end {
        if chars[i] == '\n' && chars[i + 1] == '\n' {
            last_break = Some(i + 2);
        }
        i += 1;
    }
    last_break.filter(|&pos| pos > start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("hello world", 1000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].end, 11);
    }

    #[test]
    fn long_text_overlaps_windows() {
        let text = "a".repeat(500);
        let chunks = chunk_text(&text, 200);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(pair[1].start < pair[0].end, "windows must overlap");
        }
    }

    #[test]
    fn prefers_paragraph_break_near_window_end() {
        let mut text = "x".repeat(180);
        text.push_str("\n\n");
        text.push_str(&"y".repeat(20));
        let chunks = chunk_text(&text, 200);
        assert_eq!(chunks[0].end, 182);
    }
}
