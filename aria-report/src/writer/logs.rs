//! Per-section generation logs
//!
//! ```text
//! <log_dir>/<slug(title)>/<client_id>-<slug(model)>.md
//! <log_dir>/<slug(title)>/merged.md
//! <log_dir>/<slug(title)>/metadata.json
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::CandidateRecord;
use aria_common::fs::{ensure_directory, purge_files, slugify, write_text_file};

pub const MERGED_FILE: &str = "merged.md";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Serialize)]
struct CandidateSummary<'a> {
    client_id: &'a str,
    model: &'a str,
    provider: &'a str,
    score: f64,
}

#[derive(Debug, Serialize)]
struct SectionLog<'a> {
    section: &'a str,
    language: &'a str,
    candidates: Vec<CandidateSummary<'a>>,
    merged_length: usize,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Directory holding the logs of one section
pub fn section_log_dir(log_dir: &Path, title: &str) -> PathBuf {
    log_dir.join(slugify(title))
}

/// Candidate log file name: `<client_id>-<slug(model)>.md`
pub fn candidate_file_name(candidate: &CandidateRecord) -> String {
    format!("{}-{}.md", candidate.client_id, slugify(&candidate.generation.model))
}

/// Replace the section's log directory contents with this run's outputs
pub fn persist_section_logs(
    log_dir: &Path,
    title: &str,
    language: &str,
    candidates: &[CandidateRecord],
    merged: &str,
) -> aria_common::Result<PathBuf> {
    let section_dir = ensure_directory(&section_log_dir(log_dir, title))?;
    purge_files(&section_dir, None)?;

    for candidate in candidates {
        write_text_file(
            &section_dir.join(candidate_file_name(candidate)),
            &candidate.generation.text,
        )?;
    }
    write_text_file(&section_dir.join(MERGED_FILE), merged)?;

    let log = SectionLog {
        section: title,
        language,
        candidates: candidates
            .iter()
            .map(|c| CandidateSummary {
                client_id: &c.client_id,
                model: &c.generation.model,
                provider: &c.generation.provider,
                score: round4(c.score),
            })
            .collect(),
        merged_length: merged.chars().count(),
    };
    let json = serde_json::to_string_pretty(&log)
        .map_err(|e| aria_common::Error::Internal(format!("Serialize section log failed: {}", e)))?;
    write_text_file(&section_dir.join(METADATA_FILE), &json)?;

    Ok(section_dir)
}
