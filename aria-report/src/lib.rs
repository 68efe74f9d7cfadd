//! aria-report - grounded report drafting from raw project materials
//!
//! Raw `.txt` materials are segmented into topical buckets, turned into an
//! outline, and written section by section by two independent text
//! generators whose outputs are scored and reconciled. A human revision
//! overlay is applied before the final package is written.

pub mod draft;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingest;
pub mod outline;
pub mod pipeline;
pub mod review;
pub mod revision;
pub mod segmentation;
pub mod types;
pub mod writer;

pub use draft::{save_draft, Draft};
pub use error::{ReportError, ReportResult};
pub use export::{parse_metadata_overrides, DeliveryPackage};
pub use generation::{Generation, GenerationError, GenerationPrompt, TextGenerator};
pub use outline::{build_outline, OutlineSection};
pub use pipeline::{run_default, PipelinePaths, WritingPipeline};
pub use review::{export_review_notes, ReviewComment};
pub use revision::{apply_revision_file, parse_revision_text, RevisionDirectives};
pub use segmentation::{segment_materials, BucketDefinition, BucketTable, Segmenter};
pub use types::{BucketMap, MaterialRecord, Segment, SegmentId, Topic};
pub use writer::SectionWriter;
