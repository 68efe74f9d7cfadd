//! Bucket definitions
//!
//! The bucket table is static configuration: it is built once and passed
//! into the segmenter, so tests can swap in alternate keyword sets or
//! priorities without touching global state.

use indexmap::{IndexMap, IndexSet};

use crate::types::Topic;

/// Classification settings for one topic
#[derive(Debug, Clone, PartialEq)]
pub struct BucketDefinition {
    /// Lowercase substrings counted toward this bucket's score
    pub keywords: IndexSet<String>,
    /// 1 = highest; wins ties against larger numbers
    pub priority: u32,
    /// Short description of what belongs in the bucket
    pub summary_hint: String,
}

impl BucketDefinition {
    pub fn new(keywords: &[&str], priority: u32, summary_hint: impl Into<String>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            priority,
            summary_hint: summary_hint.into(),
        }
    }
}

/// Immutable topic → definition table covering the whole classification space
#[derive(Debug, Clone)]
pub struct BucketTable {
    definitions: IndexMap<Topic, BucketDefinition>,
}

impl BucketTable {
    /// Build a table from explicit definitions
    ///
    /// A `Misc` entry is added with the lowest priority when absent, so the
    /// table always has a catch-all.
    pub fn new(definitions: impl IntoIterator<Item = (Topic, BucketDefinition)>) -> Self {
        let mut definitions: IndexMap<Topic, BucketDefinition> = definitions.into_iter().collect();
        if !definitions.contains_key(&Topic::Misc) {
            let lowest = definitions.values().map(|d| d.priority).max().unwrap_or(0);
            definitions.insert(
                Topic::Misc,
                BucketDefinition::new(&[], lowest + 1, "Unclassified material"),
            );
        }
        definitions.sort_by(|ta, a, tb, b| a.priority.cmp(&b.priority).then(ta.cmp(tb)));
        Self { definitions }
    }

    pub fn get(&self, topic: Topic) -> Option<&BucketDefinition> {
        self.definitions.get(&topic)
    }

    /// Priority of `topic`, or `u32::MAX` when the table has no entry for it
    pub fn priority(&self, topic: Topic) -> u32 {
        self.get(topic).map(|d| d.priority).unwrap_or(u32::MAX)
    }

    /// Definitions in ascending priority order
    pub fn iter(&self) -> impl Iterator<Item = (Topic, &BucketDefinition)> {
        self.definitions.iter().map(|(t, d)| (*t, d))
    }
}

impl Default for BucketTable {
    fn default() -> Self {
        Self::new([
            (
                Topic::Background,
                BucketDefinition::new(
                    &[
                        "背景", "现状", "起因", "问题", "困境", "background", "context",
                        "history", "challenge",
                    ],
                    1,
                    "Starting situation, history and problems that motivated the work",
                ),
            ),
            (
                Topic::Objectives,
                BucketDefinition::new(
                    &[
                        "目标", "理念", "定位", "愿景", "思路", "goal", "objective", "vision",
                        "mission",
                    ],
                    2,
                    "Goals, guiding ideas and intended positioning",
                ),
            ),
            (
                Topic::Implementation,
                BucketDefinition::new(
                    &[
                        "实施", "举措", "措施", "路径", "阶段", "步骤", "开展",
                        "implementation", "measure", "stage", "phase", "step",
                    ],
                    3,
                    "Concrete measures, stages and how the work was carried out",
                ),
            ),
            (
                Topic::Impact,
                BucketDefinition::new(
                    &[
                        "成效", "成果", "效果", "提升", "提高", "增长", "获奖", "impact",
                        "outcome", "result", "improve", "increase",
                    ],
                    4,
                    "Measured outcomes, results and recognition",
                ),
            ),
            (
                Topic::Reflection,
                BucketDefinition::new(
                    &[
                        "反思", "经验", "启示", "展望", "不足", "改进", "reflection", "lesson",
                        "future", "limitation",
                    ],
                    5,
                    "Lessons learned, shortcomings and next steps",
                ),
            ),
            (
                Topic::Misc,
                BucketDefinition::new(&[], 99, "Unclassified material"),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_priority_ordered() {
        let table = BucketTable::default();
        let priorities: Vec<u32> = table.iter().map(|(_, d)| d.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
        assert_eq!(table.iter().last().map(|(t, _)| t), Some(Topic::Misc));
    }

    #[test]
    fn test_misc_added_when_missing() {
        let table = BucketTable::new([
            (Topic::Impact, BucketDefinition::new(&["x"], 3, "")),
            (Topic::Background, BucketDefinition::new(&["y"], 7, "")),
        ]);
        assert_eq!(table.priority(Topic::Misc), 8);
        assert_eq!(table.priority(Topic::Objectives), u32::MAX);
        let order: Vec<Topic> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec![Topic::Impact, Topic::Background, Topic::Misc]);
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let def = BucketDefinition::new(&["Goal", "VISION"], 1, "");
        assert!(def.keywords.contains("goal"));
        assert!(def.keywords.contains("vision"));
    }
}
