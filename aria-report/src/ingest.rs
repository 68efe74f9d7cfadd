//! Raw material loader
//!
//! Recursively collects `.txt` files under the materials root. Traversal is
//! sorted by file name so identifier assignment downstream is reproducible.

use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ReportError, ReportResult};
use crate::types::MaterialRecord;

/// Extension of files treated as raw materials
const MATERIAL_EXTENSION: &str = "txt";

/// Load every `.txt` file under `raw_dir` into a [`MaterialRecord`]
///
/// # Errors
/// - [`ReportError::MaterialsNotFound`] if `raw_dir` is missing or not a directory
/// - [`ReportError::Io`] if a file cannot be read as UTF-8
pub fn load_materials(raw_dir: &Path) -> ReportResult<Vec<MaterialRecord>> {
    if !raw_dir.is_dir() {
        return Err(ReportError::MaterialsNotFound(raw_dir.to_path_buf()));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(raw_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| {
            ReportError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;

        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(MATERIAL_EXTENSION)
        {
            continue;
        }

        let relative = path.strip_prefix(raw_dir).unwrap_or(path);
        let identifier = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        debug!("Reading material file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        records.push(MaterialRecord::new(identifier, content));
    }

    info!(
        count = records.len(),
        "Loaded raw materials from {}",
        raw_dir.display()
    );
    Ok(records)
}
