//! Review feedback notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ReportResult;
use aria_common::fs::write_text_file;

/// One feedback item from a review cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub author: String,
    pub message: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
}

impl ReviewComment {
    /// New comment stamped with the current UTC time
    pub fn new(
        author: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            severity: severity.into(),
            timestamp: Utc::now(),
        }
    }

    /// `- **<severity>** | <author> | <YYYY-MM-DDTHH:MM:SS>: <message>`
    pub fn format_markdown(&self) -> String {
        format!(
            "- **{}** | {} | {}: {}",
            self.severity,
            self.author,
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.message
        )
    }
}

/// Write review notes as a markdown list under `# Review Notes`
pub fn export_review_notes(comments: &[ReviewComment], destination: &Path) -> ReportResult<()> {
    let mut lines = vec!["# Review Notes".to_string(), String::new()];
    lines.extend(comments.iter().map(ReviewComment::format_markdown));
    write_text_file(destination, &lines.join("\n"))?;
    info!(comments = comments.len(), "Exported review notes to {}", destination.display());
    Ok(())
}
