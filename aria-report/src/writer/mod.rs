//! Dual-source section writer
//!
//! For every outline section both generators receive the same grounding
//! prompt. Their outputs are scored against the section's excerpts and
//! reconciled into one text:
//!
//! 1. select excerpts and build the prompt ([`prompt`])
//! 2. call primary, then secondary; a failed call drops that candidate
//! 3. score candidates by keyword coverage and shape ([`scoring`])
//! 4. seed with the best candidate, append grounded new paragraphs from the
//!    rest ([`reconcile`])
//! 5. fall back to the raw segment text when nothing usable came back
//!
//! Writing a section never fails. Generation logs are best effort.

pub mod logs;
pub mod prompt;
pub mod reconcile;
pub mod scoring;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::generation::{Generation, TextGenerator};
use crate::outline::OutlineSection;
use crate::types::Segment;
use aria_common::config::WriterSettings;

/// Text used when a section has neither generated text nor source segments
pub const EMPTY_SECTION_PLACEHOLDER: &str = "(No source material available for this section.)";

/// One successful generation with its score
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub client_id: String,
    pub generation: Generation,
    pub score: f64,
}

/// Segment texts ordered by `(priority, identifier)`, blank-line separated
pub fn fallback_from_segments(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return EMPTY_SECTION_PLACEHOLDER.to_string();
    }
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| (s.priority, s.identifier));
    ordered
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes report sections from two generators
pub struct SectionWriter {
    primary: Arc<dyn TextGenerator>,
    secondary: Arc<dyn TextGenerator>,
    settings: WriterSettings,
    log_dir: Option<PathBuf>,
}

impl SectionWriter {
    pub fn new(
        primary: Arc<dyn TextGenerator>,
        secondary: Arc<dyn TextGenerator>,
        settings: WriterSettings,
        log_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            primary,
            secondary,
            settings,
            log_dir,
        }
    }

    /// Produce prose for one section
    pub async fn write_section(&self, section: &OutlineSection, segments: &[Segment]) -> String {
        let excerpts = prompt::select_excerpts(segments, self.settings.max_context_segments);
        let keywords = scoring::segment_keywords(excerpts.iter().copied());
        let request = prompt::build_prompt(section, &excerpts, &self.settings);

        info!(
            section = %section.title,
            excerpts = excerpts.len(),
            "Writing section"
        );

        let mut candidates = Vec::with_capacity(2);
        for generator in [&self.primary, &self.secondary] {
            match generator.generate(&request).await {
                Ok(generation) => {
                    let score = scoring::generation_score(&generation.text, &keywords);
                    debug!(
                        client = %generator.identifier(),
                        model = %generation.model,
                        score,
                        "Candidate scored"
                    );
                    candidates.push(CandidateRecord {
                        client_id: generator.identifier().to_string(),
                        generation,
                        score,
                    });
                }
                Err(e) => {
                    error!(
                        client = %generator.identifier(),
                        section = %section.title,
                        error = %e,
                        "Generation failed; dropping candidate"
                    );
                }
            }
        }

        let merged = if candidates.is_empty() {
            error!(
                section = %section.title,
                "Both generations failed; falling back to source segments"
            );
            fallback_from_segments(segments)
        } else {
            let paragraphs = reconcile::merge_candidates(
                &candidates,
                &keywords,
                self.settings.min_paragraph_score,
            );
            if paragraphs.is_empty() {
                warn!(section = %section.title, "Merged text is empty; using source segments");
                fallback_from_segments(segments)
            } else {
                paragraphs.join("\n\n")
            }
        };

        if let Some(log_dir) = &self.log_dir {
            if let Err(e) = logs::persist_section_logs(
                log_dir,
                &section.title,
                &self.settings.language,
                &candidates,
                &merged,
            ) {
                warn!(section = %section.title, error = %e, "Failed to persist generation logs");
            }
        }

        merged
    }
}
