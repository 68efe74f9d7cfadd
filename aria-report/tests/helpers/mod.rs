//! Test Helper Utilities
//!
//! Shared utilities for aria-report integration tests
#![allow(dead_code, unused_imports)]

pub mod log_capture;
pub mod project;
pub mod stub_generator;

pub use log_capture::{capture_logs, LogCapture};
pub use project::TestProject;
pub use stub_generator::{prompt_excerpts, StubGenerator, StubReply};
