//! Final deliverable packaging

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::draft::Draft;
use crate::error::ReportResult;
use aria_common::fs::write_text_file;

pub const DELIVERABLE_FILE: &str = "deliverable.md";
pub const METADATA_FILE: &str = "metadata.json";

/// Final document plus string metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPackage {
    pub draft: Draft,
    pub metadata: IndexMap<String, String>,
}

impl DeliveryPackage {
    /// Package `draft` with standard metadata, then apply `overrides`
    ///
    /// Standard keys are `title`, `materials_count` and `sections`; an
    /// override with the same key replaces the value in place.
    pub fn new(draft: Draft, materials_count: usize, overrides: &IndexMap<String, String>) -> Self {
        let mut metadata = IndexMap::new();
        metadata.insert("title".to_string(), draft.title.clone());
        metadata.insert("materials_count".to_string(), materials_count.to_string());
        metadata.insert("sections".to_string(), draft.sections.len().to_string());
        for (key, value) in overrides {
            metadata.insert(key.clone(), value.clone());
        }
        Self { draft, metadata }
    }

    /// Write `deliverable.md` and `metadata.json` into `destination`
    pub fn write(&self, destination: &Path) -> ReportResult<PathBuf> {
        let deliverable = destination.join(DELIVERABLE_FILE);
        write_text_file(&deliverable, &self.draft.to_markdown())?;

        let json = serde_json::to_string_pretty(&self.metadata)?;
        write_text_file(&destination.join(METADATA_FILE), &json)?;

        info!("Wrote delivery package to {}", destination.display());
        Ok(deliverable)
    }
}

/// Parse `key=value` entries; the first `=` separates, both sides are trimmed
pub fn parse_metadata_overrides<S: AsRef<str>>(
    entries: &[S],
) -> aria_common::Result<IndexMap<String, String>> {
    let mut overrides = IndexMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            aria_common::Error::InvalidInput(format!(
                "Metadata override '{}' must use key=value format",
                entry
            ))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(aria_common::Error::InvalidInput(format!(
                "Metadata override '{}' has an empty key",
                entry
            )));
        }
        overrides.insert(key.to_string(), value.trim().to_string());
    }
    Ok(overrides)
}
