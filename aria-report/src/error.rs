//! Error types for aria-report
//!
//! Only failures that must stop a run surface here. Per-call generation
//! failures are absorbed inside the section writer and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

use crate::generation::GenerationError;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum ReportError {
    /// Raw materials directory missing or not a directory
    #[error("Materials directory not found: {0}")]
    MaterialsNotFound(PathBuf),

    /// Generation client could not be constructed (credential, provider, HTTP setup)
    #[error("Generation client setup failed: {0}")]
    Generation(#[from] GenerationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// aria-common error
    #[error("Common error: {0}")]
    Common(#[from] aria_common::Error),
}

/// Result type for pipeline operations
pub type ReportResult<T> = Result<T, ReportError>;
