//! # Aria Common Library
//!
//! Shared code for the aria-report workspace including:
//! - Error and result types
//! - TOML configuration model and resolution
//! - Filesystem helpers for text outputs (create-then-write, stale purge, slugs)

pub mod config;
pub mod error;
pub mod fs;

pub use error::{Error, Result};
