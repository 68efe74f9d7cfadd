//! Core types shared across the report pipeline
//!
//! Materials flow through the pipeline as:
//! - [`MaterialRecord`]: raw text artifact, immutable once loaded
//! - [`Segment`]: one classified, deduplicated paragraph owned by a bucket
//! - [`BucketMap`]: topic → ordered segments, the segmentation output

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Materials
// ============================================================================

/// A single ingested artifact ready for segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Path relative to the materials root, `/`-separated
    pub identifier: String,
    /// UTF-8 text content
    pub content: String,
}

impl MaterialRecord {
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Topics
// ============================================================================

/// Topical bucket a paragraph is classified into
///
/// `Misc` is the catch-all for paragraphs that match no bucket keyword.
/// Declaration order is the canonical iteration order for bucket tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Background,
    Objectives,
    Implementation,
    Impact,
    Reflection,
    Misc,
}

impl Topic {
    /// All topics in canonical order
    pub const ALL: [Topic; 6] = [
        Topic::Background,
        Topic::Objectives,
        Topic::Implementation,
        Topic::Impact,
        Topic::Reflection,
        Topic::Misc,
    ];

    /// Stable key used for directory names and the segment index
    pub fn key(self) -> &'static str {
        match self {
            Topic::Background => "background",
            Topic::Objectives => "objectives",
            Topic::Implementation => "implementation",
            Topic::Impact => "impact",
            Topic::Reflection => "reflection",
            Topic::Misc => "misc",
        }
    }

    /// Parse a bucket key back into a topic
    pub fn from_key(key: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn is_catch_all(self) -> bool {
        self == Topic::Misc
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Segments
// ============================================================================

/// Run-scoped monotonic segment identifier, rendered as `SEG-NNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u32);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SEG-{:03}", self.0)
    }
}

impl Serialize for SegmentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One classified, deduplicated unit of source text
///
/// Created once during segmentation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub identifier: SegmentId,
    pub topic: Topic,
    /// Copied from the bucket definition (1 = highest)
    pub priority: u32,
    pub text: String,
    /// Identifier of the material the paragraph came from
    pub source_path: String,
    /// First line of the text, at most 120 characters
    pub notes: String,
}

/// Segmentation output: topic → segments in discovery order
///
/// Iteration order is ascending bucket priority; empty buckets are absent.
pub type BucketMap = IndexMap<Topic, Vec<Segment>>;
