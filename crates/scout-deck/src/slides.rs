//! Slide-count parsing and main-image selection (spec §4.4 CONTENT/ITERATE
//! states). Pure functions operating on already-collected page metadata so
//! they're testable without a live browser.

use regex::Regex;
use std::sync::OnceLock;

fn slide_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\s*(?:of|/)\s*(\d+)").expect("static slide-count regex is valid"))
}

/// Extract the total slide count from a page-indicator string such as
/// "3 of 12" or "3 / 12". Defaults to 1 when no match is found.
pub fn parse_slide_count(indicator_text: &str) -> u32 {
    slide_count_pattern()
        .captures(indicator_text)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|&total| total > 0)
        .unwrap_or(1)
}

#[derive(Debug, Clone, Copy)]
pub struct ImageCandidate {
    pub displayed: bool,
    pub width: u32,
    pub height: u32,
    /// true if matched via the traditional `.page`/`.slide`/`[data-page]`/
    /// `.document-page` container selectors rather than a bare `<img>`.
    pub from_container_fallback: bool,
}

/// Pick the main slide image: first displayed image wider than 300 and
/// taller than 200, else the largest displayed image with both dimensions
/// over 100, else the first container-fallback match.
pub fn pick_main_image(candidates: &[ImageCandidate]) -> Option<usize> {
    if let Some(idx) = candidates.iter().position(|c| c.displayed && c.width > 300 && c.height > 200) {
        return Some(idx);
    }

    let largest = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.displayed && c.width > 100 && c.height > 100)
        .max_by_key(|(_, c)| c.width as u64 * c.height as u64)
        .map(|(idx, _)| idx);
    if largest.is_some() {
        return largest;
    }

    candidates.iter().position(|c| c.from_container_fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_of_style_indicator() {
        assert_eq!(parse_slide_count("3 of 12"), 12);
    }

    #[test]
    fn parses_slash_style_indicator() {
        assert_eq!(parse_slide_count("Slide 3/12"), 12);
    }

    #[test]
    fn defaults_to_one_when_unmatched() {
        assert_eq!(parse_slide_count("no indicator here"), 1);
    }

    #[test]
    fn prefers_first_large_displayed_image() {
        let candidates = [
            ImageCandidate { displayed: false, width: 400, height: 400, from_container_fallback: false },
            ImageCandidate { displayed: true, width: 320, height: 250, from_container_fallback: false },
        ];
        assert_eq!(pick_main_image(&candidates), Some(1));
    }

    #[test]
    fn falls_back_to_largest_medium_image() {
        let candidates = [
            ImageCandidate { displayed: true, width: 150, height: 150, from_container_fallback: false },
            ImageCandidate { displayed: true, width: 200, height: 180, from_container_fallback: false },
        ];
        assert_eq!(pick_main_image(&candidates), Some(1));
    }

    #[test]
    fn falls_back_to_container_selector_when_no_image_qualifies() {
        let candidates = [ImageCandidate { displayed: true, width: 50, height: 50, from_container_fallback: true }];
        assert_eq!(pick_main_image(&candidates), Some(0));
    }

    #[test]
    fn returns_none_when_nothing_matches() {
        let candidates = [ImageCandidate { displayed: false, width: 400, height: 400, from_container_fallback: false }];
        assert_eq!(pick_main_image(&candidates), None);
    }
}
