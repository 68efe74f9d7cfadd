//! Report draft and its markdown rendering

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::ReportResult;
use aria_common::fs::write_text_file;

/// Assembled report: title plus ordered heading → prose sections
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Draft {
    pub title: String,
    pub sections: IndexMap<String, String>,
}

impl Draft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: IndexMap::new(),
        }
    }

    /// Insert or replace a section, keeping its original position on replace
    pub fn set_section(&mut self, heading: impl Into<String>, content: impl Into<String>) {
        self.sections.insert(heading.into(), content.into());
    }

    /// `# title`, then `\n## heading\n<content>` per section, newline-joined
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("# {}", self.title)];
        for (heading, content) in &self.sections {
            lines.push(format!("\n## {}\n", heading));
            lines.push(content.clone());
        }
        lines.join("\n")
    }
}

/// Write the draft markdown to `path`
pub fn save_draft(draft: &Draft, path: &Path) -> ReportResult<()> {
    write_text_file(path, &draft.to_markdown())?;
    info!(sections = draft.sections.len(), "Saved draft to {}", path.display());
    Ok(())
}
