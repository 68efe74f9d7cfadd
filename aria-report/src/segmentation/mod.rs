//! Segmentation engine
//!
//! Turns raw materials into classified, deduplicated segments:
//!
//! 1. split each material on blank lines and clean page markers ([`cleaner`])
//! 2. glue headings and wrapped sentences back onto their bodies ([`merger`])
//! 3. drop noise fragments ([`cleaner::should_skip`])
//! 4. score every bucket and pick one ([`classifier`])
//! 5. deduplicate within the chosen bucket and assign the next `SEG-NNN`
//!
//! The identifier counter lives for one [`Segmenter::segment`] call and is
//! shared across all materials, so identifiers follow discovery order.

pub mod buckets;
pub mod classifier;
pub mod cleaner;
pub mod merger;
pub mod storage;

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::types::{BucketMap, MaterialRecord, Segment, SegmentId, Topic};
use aria_common::fs::truncate_chars;

pub use buckets::{BucketDefinition, BucketTable};
pub use storage::persist_segments;

/// Maximum characters kept in a segment's `notes`
const NOTES_MAX_CHARS: usize = 120;

/// Classifies material paragraphs into topical buckets
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    table: BucketTable,
}

impl Segmenter {
    pub fn new(table: BucketTable) -> Self {
        Self { table }
    }

    /// Clean, merge and filter one material's text into candidate paragraphs
    pub fn prepare_paragraphs(&self, content: &str) -> Vec<String> {
        let cleaned: Vec<String> = cleaner::split_paragraphs(content)
            .iter()
            .filter_map(|p| cleaner::clean_paragraph(p))
            .collect();

        merger::merge_all(cleaned)
            .into_iter()
            .filter(|p| !cleaner::should_skip(p))
            .collect()
    }

    /// Segment all materials into a priority-ordered [`BucketMap`]
    pub fn segment(&self, materials: &[MaterialRecord]) -> BucketMap {
        let mut next_id: u32 = 1;
        let mut collected: HashMap<Topic, Vec<Segment>> = HashMap::new();
        let mut seen: HashMap<Topic, HashSet<String>> = HashMap::new();
        let mut duplicates = 0usize;

        for material in materials {
            let paragraphs = self.prepare_paragraphs(&material.content);
            debug!(
                material = %material.identifier,
                paragraphs = paragraphs.len(),
                "Prepared paragraphs"
            );

            for paragraph in paragraphs {
                let topic = classifier::classify(&self.table, &paragraph);
                let normalized = classifier::normalize(&paragraph);

                if !seen.entry(topic).or_default().insert(normalized) {
                    duplicates += 1;
                    continue;
                }

                let notes = truncate_chars(paragraph.lines().next().unwrap_or("").trim(), NOTES_MAX_CHARS)
                    .to_string();
                let segment = Segment {
                    identifier: SegmentId(next_id),
                    topic,
                    priority: self.table.priority(topic),
                    text: paragraph,
                    source_path: material.identifier.clone(),
                    notes,
                };
                next_id += 1;
                collected.entry(topic).or_default().push(segment);
            }
        }

        let mut buckets = BucketMap::new();
        for (topic, _) in self.table.iter() {
            if let Some(segments) = collected.remove(&topic).filter(|s| !s.is_empty()) {
                buckets.insert(topic, segments);
            }
        }

        info!(
            materials = materials.len(),
            segments = next_id - 1,
            buckets = buckets.len(),
            duplicates,
            "Segmentation complete"
        );
        buckets
    }
}

/// Segment materials with the default bucket table
pub fn segment_materials(materials: &[MaterialRecord]) -> BucketMap {
    Segmenter::default().segment(materials)
}
