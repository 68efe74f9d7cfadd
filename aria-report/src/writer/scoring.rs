//! Keyword-coverage scoring for candidate texts
//!
//! Keywords are the lowercased word runs (ASCII alphanumerics and CJK
//! ideographs) longer than two characters found in the grounding excerpts.
//! Coverage is the fraction of those keywords that reappear in a text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::segmentation::cleaner::split_paragraphs;
use crate::types::Segment;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9\x{4e00}-\x{9fa5}]{2,}").unwrap());

const MIN_KEYWORD_CHARS: usize = 3;

/// Distinct keywords drawn from segment texts
pub fn segment_keywords<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    for segment in segments {
        let lowered = segment.text.to_lowercase();
        for m in WORD.find_iter(&lowered) {
            if m.as_str().chars().count() >= MIN_KEYWORD_CHARS {
                keywords.insert(m.as_str().to_string());
            }
        }
    }
    keywords
}

/// Fraction of `keywords` contained in `text` (0.0 when there are none)
pub fn keyword_coverage(text: &str, keywords: &BTreeSet<String>) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let lowered = text.to_lowercase();
    let hits = keywords.iter().filter(|k| lowered.contains(k.as_str())).count();
    hits as f64 / keywords.len() as f64
}

/// Trimmed, non-empty blank-line separated paragraphs
pub fn extract_paragraphs(text: &str) -> Vec<String> {
    split_paragraphs(text)
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whole-candidate score: coverage, length bonus (≤2.0) and paragraph bonus
pub fn generation_score(text: &str, keywords: &BTreeSet<String>) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let coverage = keyword_coverage(text, keywords);
    let length_bonus = (text.chars().count() as f64 / 600.0).min(2.0);
    let paragraph_bonus = 0.3 * extract_paragraphs(text).len().saturating_sub(1) as f64;
    coverage * 5.0 + length_bonus + paragraph_bonus
}

/// Per-paragraph score used when merging non-winning candidates
pub fn paragraph_score(paragraph: &str, keywords: &BTreeSet<String>) -> f64 {
    let coverage = keyword_coverage(paragraph, keywords);
    let length_factor = (paragraph.chars().count() as f64 / 400.0).min(1.0);
    coverage * 3.0 + length_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SegmentId, Topic};

    fn segment(text: &str) -> Segment {
        Segment {
            identifier: SegmentId(1),
            topic: Topic::Impact,
            priority: 4,
            text: text.to_string(),
            source_path: "a.txt".to_string(),
            notes: String::new(),
        }
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_keywords_skip_short_runs() {
        let segs = [segment("The AI lab improved reading scores; 学生成绩提升。 ok")];
        let found = segment_keywords(&segs);
        assert!(found.contains("the"));
        assert!(found.contains("improved"));
        assert!(found.contains("学生成绩提升"));
        assert!(!found.contains("ai"));
        assert!(!found.contains("ok"));
    }

    #[test]
    fn test_keywords_are_lowercased_and_distinct() {
        let segs = [segment("Reading READING reading"), segment("reading")];
        assert_eq!(segment_keywords(&segs), keywords(&["reading"]));
    }

    #[test]
    fn test_coverage_fraction() {
        let kw = keywords(&["alpha", "beta", "gamma", "delta"]);
        assert_eq!(keyword_coverage("ALPHA and beta", &kw), 0.5);
        assert_eq!(keyword_coverage("anything", &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_generation_score_components() {
        let kw = keywords(&["alpha", "beta"]);
        assert_eq!(generation_score("   ", &kw), 0.0);

        // full coverage, 1 paragraph, short text
        let one = generation_score("alpha beta", &kw);
        assert!((one - (5.0 + 10.0 / 600.0)).abs() < 1e-9);

        // two paragraphs add 0.3
        let two = generation_score("alpha\n\nbeta", &kw);
        assert!((two - (5.0 + 11.0 / 600.0 + 0.3)).abs() < 1e-9);

        // length bonus capped at 2.0
        let long = "x".repeat(5000);
        assert!((generation_score(&long, &kw) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_paragraph_score_components() {
        let kw = keywords(&["alpha", "beta"]);
        assert!((paragraph_score("alpha", &kw) - (1.5 + 5.0 / 400.0)).abs() < 1e-9);
        assert!((paragraph_score(&"z".repeat(800), &kw) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extract_paragraphs() {
        assert_eq!(
            extract_paragraphs("  one\n\n\n two \n\n   \nthree"),
            vec!["one", "two", "three"]
        );
    }
}
