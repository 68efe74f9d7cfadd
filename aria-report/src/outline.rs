//! Outline derivation from segmented buckets

use serde::Serialize;
use tracing::debug;

use crate::types::{BucketMap, Segment, Topic};

/// Bullets kept per section
pub const MAX_BULLETS: usize = 5;

const CLAUSE_TERMINALS: &[char] = &['。', '！', '？', '.', '!', '?'];

/// One section of the report outline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineSection {
    pub topic: Topic,
    pub title: String,
    /// `"<first clause> [SEG-NNN]"` anchors, at most [`MAX_BULLETS`]
    pub bullet_points: Vec<String>,
}

/// Human-readable section title for a bucket key
///
/// `_` and `-` become spaces and every word is capitalized.
pub fn section_title(key: &str) -> String {
    key.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text up to the first sentence terminal, trimmed
pub fn first_clause(text: &str) -> &str {
    let end = text.find(CLAUSE_TERMINALS).unwrap_or(text.len());
    text[..end].trim()
}

fn bullet(segment: &Segment) -> Option<String> {
    let clause = first_clause(&segment.text);
    if clause.is_empty() {
        None
    } else {
        Some(format!("{} [{}]", clause, segment.identifier))
    }
}

/// Build one outline section per non-catch-all bucket, in bucket order
pub fn build_outline(buckets: &BucketMap) -> Vec<OutlineSection> {
    let outline: Vec<OutlineSection> = buckets
        .iter()
        .filter(|(topic, _)| !topic.is_catch_all())
        .map(|(topic, segments)| OutlineSection {
            topic: *topic,
            title: section_title(topic.key()),
            bullet_points: segments.iter().take(MAX_BULLETS).filter_map(bullet).collect(),
        })
        .collect();

    debug!(sections = outline.len(), "Built outline");
    outline
}
