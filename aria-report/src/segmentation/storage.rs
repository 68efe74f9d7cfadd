//! Persisting segmented buckets to the organized tree
//!
//! Layout:
//! ```text
//! <organized>/<topic>/<PP>-<SEG-NNN>.txt
//! <organized>/index.csv
//! <staging>/<PP>-<SEG-NNN>.txt      (catch-all segments)
//! ```
//! Every run purges stale `.txt` files first, so the tree always reflects
//! exactly the latest segmentation.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ReportResult;
use crate::types::{BucketMap, Segment, Topic};
use aria_common::fs::{ensure_directory, purge_files, remove_dir_if_empty, write_text_file};

pub const INDEX_FILE: &str = "index.csv";

const INDEX_HEADER: [&str; 5] = ["identifier", "topic", "priority", "notes", "source_path"];

/// File name of a persisted segment: `<PP>-<SEG-NNN>.txt`
pub fn segment_file_name(segment: &Segment) -> String {
    format!("{:02}-{}.txt", segment.priority, segment.identifier)
}

/// Quote a CSV field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_record(fields: &[&str]) -> String {
    let mut line = fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",");
    line.push_str("\r\n");
    line
}

/// Render the segment index, sorted by `(priority, identifier)`
pub fn render_index(buckets: &BucketMap) -> String {
    let mut segments: Vec<&Segment> = buckets.values().flatten().collect();
    segments.sort_by_key(|s| (s.priority, s.identifier));

    let mut csv = csv_record(&INDEX_HEADER);
    for segment in segments {
        let id = segment.identifier.to_string();
        let priority = segment.priority.to_string();
        csv.push_str(&csv_record(&[
            &id,
            segment.topic.key(),
            &priority,
            &segment.notes,
            &segment.source_path,
        ]));
    }
    csv
}

/// Remove stale segment files from the organized tree and staging area
fn purge_previous_run(buckets: &BucketMap, organized_dir: &Path, staging_dir: &Path) -> ReportResult<()> {
    let mut purged = purge_files(staging_dir, Some("txt"))?;

    if organized_dir.is_dir() {
        let subdirs: Vec<PathBuf> = std::fs::read_dir(organized_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();

        for dir in subdirs {
            purged += purge_files(&dir, Some("txt"))?;

            let still_present = dir
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(Topic::from_key)
                .is_some_and(|t| buckets.contains_key(&t) && !t.is_catch_all());
            if !still_present && remove_dir_if_empty(&dir)? {
                debug!("Removed stale bucket directory {}", dir.display());
            }
        }
    }

    if purged > 0 {
        debug!(purged, "Purged segment files from previous run");
    }
    Ok(())
}

/// Write every segment to disk plus the CSV index
///
/// Returns the path of the written index.
pub fn persist_segments(
    buckets: &BucketMap,
    organized_dir: &Path,
    staging_dir: &Path,
) -> ReportResult<PathBuf> {
    ensure_directory(organized_dir)?;
    ensure_directory(staging_dir)?;
    purge_previous_run(buckets, organized_dir, staging_dir)?;

    for (topic, segments) in buckets {
        let target_dir = if topic.is_catch_all() {
            staging_dir.to_path_buf()
        } else {
            organized_dir.join(topic.key())
        };

        for segment in segments {
            write_text_file(&target_dir.join(segment_file_name(segment)), &segment.text)?;
        }
    }

    let index_path = organized_dir.join(INDEX_FILE);
    write_text_file(&index_path, &render_index(buckets))?;

    info!(
        segments = buckets.values().map(Vec::len).sum::<usize>(),
        "Persisted segments to {}",
        organized_dir.display()
    );
    Ok(index_path)
}
