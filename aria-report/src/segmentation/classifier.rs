//! Keyword scoring with structural bonuses

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::buckets::BucketTable;
use super::merger::{has_enumerated_line, is_stage_heading};
use crate::types::Topic;

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[%％]").unwrap());

static COUNTED_QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*(?:人|名|项|所|次|个|篇)").unwrap());

static YEAR_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}\s*年").unwrap());

const OUTLOOK_OPENERS: &[&str] = &["展望", "下一步", "next"];

/// Trimmed, lowercased text used for scoring and deduplication
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Number of keywords of `topic` occurring in `normalized`
pub fn keyword_hits(table: &BucketTable, topic: Topic, normalized: &str) -> u32 {
    table
        .get(topic)
        .map(|def| {
            def.keywords
                .iter()
                .filter(|k| !k.is_empty() && normalized.contains(k.as_str()))
                .count() as u32
        })
        .unwrap_or(0)
}

/// Structural bonus for `topic`, independent of keyword hits
pub fn heuristic_bonus(topic: Topic, original: &str, normalized: &str) -> u32 {
    match topic {
        Topic::Impact => {
            let mut bonus = 0;
            if PERCENT.is_match(normalized) {
                bonus += 2;
            }
            if COUNTED_QUANTITY.is_match(normalized) {
                bonus += 1;
            }
            bonus
        }
        Topic::Implementation => {
            let mut bonus = 0;
            if is_stage_heading(original) {
                bonus += 2;
            }
            if has_enumerated_line(original) {
                bonus += 1;
            }
            bonus
        }
        Topic::Background => u32::from(YEAR_MARKER.is_match(normalized)),
        Topic::Reflection => u32::from(OUTLOOK_OPENERS.iter().any(|o| normalized.starts_with(o))),
        Topic::Objectives | Topic::Misc => 0,
    }
}

/// Score of `topic` for a paragraph; bonuses only count once a keyword matched
pub fn score(table: &BucketTable, topic: Topic, original: &str, normalized: &str) -> u32 {
    let hits = keyword_hits(table, topic, normalized);
    if hits == 0 {
        0
    } else {
        hits + heuristic_bonus(topic, original, normalized)
    }
}

/// Pick the bucket for a paragraph
///
/// Buckets are visited in ascending priority and only a strictly higher
/// score replaces the current choice, so ties go to the higher-priority
/// bucket. Paragraphs scoring zero everywhere land in `Misc`.
pub fn classify(table: &BucketTable, paragraph: &str) -> Topic {
    let normalized = normalize(paragraph);
    let mut best = (Topic::Misc, 0u32);

    for (topic, _) in table.iter() {
        if topic.is_catch_all() {
            continue;
        }
        let topic_score = score(table, topic, paragraph, &normalized);
        if topic_score > best.1 {
            best = (topic, topic_score);
        }
    }

    trace!(topic = %best.0, score = best.1, "Classified paragraph");
    best.0
}
