//! Human revision overlay
//!
//! A lightweight markdown file replaces draft sections after generation:
//!
//! ```markdown
//! # Optional New Title
//!
//! ## Background
//! Replacement text for the Background section.
//! ```
//!
//! Headings are matched exactly. Unknown headings become new sections at the
//! end of the draft.

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::draft::Draft;
use crate::error::ReportResult;

/// Parsed overlay: optional title override plus ordered section replacements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevisionDirectives {
    pub title: Option<String>,
    pub sections: IndexMap<String, String>,
}

/// Trim a section body and collapse runs of blank lines to one
fn normalize_body(lines: &[&str]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && kept.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        kept.push(if blank { "" } else { line });
    }
    kept.join("\n").trim().to_string()
}

/// Parse overlay markdown
pub fn parse_revision_text(text: &str) -> RevisionDirectives {
    let mut directives = RevisionDirectives::default();
    let mut current: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    fn flush(directives: &mut RevisionDirectives, heading: Option<String>, buffer: &[&str]) {
        let Some(heading) = heading else { return };
        let body = normalize_body(buffer);
        if heading.is_empty() || body.is_empty() {
            debug!(section = %heading, "Ignoring empty revision section");
            return;
        }
        directives.sections.insert(heading, body);
    }

    for raw_line in text.lines() {
        let line = raw_line.trim_end();

        if let Some(heading) = line.strip_prefix("## ") {
            flush(&mut directives, current.take(), &buffer);
            buffer.clear();
            current = Some(heading.trim().to_string());
            continue;
        }

        if let Some(title) = line.strip_prefix("# ") {
            if current.is_none() && directives.title.is_none() {
                let title = title.trim();
                if !title.is_empty() {
                    directives.title = Some(title.to_string());
                }
                continue;
            }
        }

        if current.is_some() {
            buffer.push(line);
        }
    }
    flush(&mut directives, current.take(), &buffer);

    directives
}

/// Apply parsed directives to a draft, returning the revised copy
pub fn apply_directives(draft: &Draft, directives: &RevisionDirectives) -> Draft {
    let mut revised = draft.clone();

    for (heading, body) in &directives.sections {
        if revised.sections.contains_key(heading) {
            info!(section = %heading, "Replacing section from revision overlay");
        } else {
            warn!(section = %heading, "Revision overlay adds a section not in the draft; appending");
        }
        revised.set_section(heading.clone(), body.clone());
    }

    if let Some(title) = &directives.title {
        revised.title = title.clone();
    }
    revised
}

/// Apply the overlay at `path` when it exists
///
/// A missing file leaves the draft unchanged.
pub fn apply_revision_file(draft: &Draft, path: &Path) -> ReportResult<Draft> {
    if !path.is_file() {
        info!("No revision overlay at {}; skipping revision step", path.display());
        return Ok(draft.clone());
    }

    let text = std::fs::read_to_string(path)?;
    let directives = parse_revision_text(&text);
    Ok(apply_directives(draft, &directives))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_draft() -> Draft {
        let mut draft = Draft::new("Original");
        draft.set_section("A", "x");
        draft.set_section("B", "y");
        draft
    }

    #[test]
    fn test_replace_existing_section() {
        let revised = apply_directives(&sample_draft(), &parse_revision_text("## A\nNEW"));
        assert_eq!(revised.title, "Original");
        assert_eq!(revised.sections["A"], "NEW");
        assert_eq!(revised.sections["B"], "y");
    }

    #[test]
    fn test_leading_title_overrides() {
        let revised = apply_directives(&sample_draft(), &parse_revision_text("# Title2\n"));
        assert_eq!(revised.title, "Title2");
        assert_eq!(revised.sections, sample_draft().sections);
    }

    #[test]
    fn test_title_after_section_is_body_text() {
        let directives = parse_revision_text("## A\n# Not a title\nbody");
        assert_eq!(directives.title, None);
        assert_eq!(directives.sections["A"], "# Not a title\nbody");
    }

    #[test]
    fn test_only_first_title_counts() {
        let directives = parse_revision_text("# First\n# Second\n## A\ntext");
        assert_eq!(directives.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_body_trimmed_and_blank_runs_collapsed() {
        let directives = parse_revision_text("## A\n\n\nline one\n\n\n\nline two\n\n");
        assert_eq!(directives.sections["A"], "line one\n\nline two");
    }

    #[test]
    fn test_empty_sections_and_preamble_ignored() {
        let directives = parse_revision_text("stray preamble\n## Empty\n\n   \n## C\nnew");
        assert_eq!(directives.sections.len(), 1);
        assert_eq!(directives.sections["C"], "new");
    }

    #[test]
    fn test_unknown_section_appended() {
        let revised = apply_directives(&sample_draft(), &parse_revision_text("## C\nextra"));
        let headings: Vec<&String> = revised.sections.keys().collect();
        assert_eq!(headings, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_file_leaves_draft_unchanged() {
        let dir = TempDir::new().unwrap();
        let revised = apply_revision_file(&sample_draft(), &dir.path().join("directives.md")).unwrap();
        assert_eq!(revised, sample_draft());
    }

    #[test]
    fn test_apply_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("directives.md");
        std::fs::write(&path, "# Final Title\n\n## B\nRevised B.\n").unwrap();
        let revised = apply_revision_file(&sample_draft(), &path).unwrap();
        assert_eq!(revised.title, "Final Title");
        assert_eq!(revised.sections["B"], "Revised B.");
    }
}
