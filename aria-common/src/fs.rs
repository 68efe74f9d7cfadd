//! Filesystem helpers for text outputs
//!
//! All persisted artifacts (bucket files, drafts, logs, packages) go through
//! these helpers so that every write creates its parent directory first and
//! every directory rewrite can purge what a previous run left behind.

use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runs of characters that are not ASCII alphanumerics or CJK ideographs
static SLUG_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\x{4e00}-\x{9fa5}]+").unwrap());

/// Create a directory (and parents) if missing and return its path
pub fn ensure_directory(path: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(path)?;
    debug!("Ensured directory exists: {}", path.display());
    Ok(path.to_path_buf())
}

/// Write UTF-8 text, creating parent directories first
pub fn write_text_file(destination: &Path, text: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(destination, text)?;
    debug!(bytes = text.len(), "Wrote text output to {}", destination.display());
    Ok(())
}

/// Remove regular files directly inside `dir`
///
/// When `extension` is given only files with that extension are removed.
/// A missing directory is not an error. Returns the number of files removed.
pub fn purge_files(dir: &Path, extension: Option<&str>) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = match extension {
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext),
            None => true,
        };
        if matches {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(removed, "Purged stale files from {}", dir.display());
    }
    Ok(removed)
}

/// Remove `dir` if it exists and is empty; returns whether it was removed
pub fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    if std::fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    std::fs::remove_dir(dir)?;
    Ok(true)
}

/// Filesystem-safe slug: non-word runs become `-`, trimmed and lowercased
///
/// Chinese ideographs are kept. Falls back to `"section"` when nothing
/// survives.
pub fn slugify(value: &str) -> String {
    let sanitized = SLUG_SEPARATOR.replace_all(value.trim(), "-");
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        "section".to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// First `max_chars` characters of `text` (char-boundary safe)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
