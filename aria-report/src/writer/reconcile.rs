//! Candidate reconciliation
//!
//! The highest-scoring candidate provides the backbone; the others only
//! contribute paragraphs that are new and sufficiently grounded.

use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::scoring::{extract_paragraphs, paragraph_score};
use super::CandidateRecord;

/// Index of the best candidate; the earliest wins ties
pub fn best_candidate(candidates: &[CandidateRecord]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        match best {
            Some(b) if candidates[b].score >= candidate.score => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Merge candidate texts into one ordered paragraph list
///
/// Returns an empty list when no candidate produced any paragraph.
pub fn merge_candidates(
    candidates: &[CandidateRecord],
    keywords: &BTreeSet<String>,
    min_paragraph_score: f64,
) -> Vec<String> {
    let Some(best_idx) = best_candidate(candidates) else {
        return Vec::new();
    };

    let mut merged = extract_paragraphs(&candidates[best_idx].generation.text);
    let mut present: HashSet<String> = merged.iter().cloned().collect();

    let mut others: Vec<usize> = (0..candidates.len()).filter(|&i| i != best_idx).collect();
    others.sort_by(|&a, &b| candidates[b].score.total_cmp(&candidates[a].score));

    for idx in others {
        let candidate = &candidates[idx];
        for paragraph in extract_paragraphs(&candidate.generation.text) {
            if present.contains(&paragraph) {
                continue;
            }
            let score = paragraph_score(&paragraph, keywords);
            if score < min_paragraph_score {
                debug!(
                    client = %candidate.client_id,
                    score,
                    "Paragraph below merge threshold"
                );
                continue;
            }
            present.insert(paragraph.clone());
            merged.push(paragraph);
        }
    }

    debug!(
        best = %candidates[best_idx].client_id,
        paragraphs = merged.len(),
        "Merged candidates"
    );
    merged
}
