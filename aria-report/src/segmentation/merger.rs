//! Heading recognition and the paragraph merge passes
//!
//! Source documents frequently put a heading in its own paragraph, or wrap a
//! sentence across a blank line. The passes below glue those fragments back
//! onto their body text. Each pass consumes the sequence and returns a new
//! one; they run in the order of [`merge_all`].

use once_cell::sync::Lazy;
use regex::Regex;

/// `第一阶段`, `第3步`, `第二部分` ...
static NUMERAL_STAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^第[一二三四五六七八九十百零〇0-9]+(?:阶段|步|部分|环节|时期)").unwrap()
});

/// `Phase 1`, `stage 2`, `Step 3`
static ENGLISH_STAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:phase|stage|step)\s*\d+").unwrap());

/// `（一）`, `(2)`, `①`, `三、`
static ENUMERATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[（(]\s*[一二三四五六七八九十百0-9]+\s*[）)]|[\x{2460}-\x{2473}]|[一二三四五六七八九十百0-9]+、)",
    )
    .unwrap()
});

const STAGE_LABELS: &[&str] = &[
    "准备阶段",
    "启动阶段",
    "实施阶段",
    "推进阶段",
    "深化阶段",
    "总结阶段",
    "巩固阶段",
    "提升阶段",
    "验收阶段",
];

const STAGE_SUFFIXES: &[&str] = &["阶段", "时期", "环节"];

const STAGE_SUFFIX_MAX_CHARS: usize = 20;

const SHORT_HEADING_MAX_CHARS: usize = 6;

const SENTENCE_TERMINALS: &[char] = &[
    '。', '！', '？', '!', '?', '.', '；', ';', '…', '”', '"', '」', '』',
];

const CJK_PUNCTUATION: &[char] = &[
    '，', '。', '！', '？', '；', '：', '、', '（', '）', '《', '》', '“', '”', '‘', '’', '【',
    '】', '—', '…', '·', '「', '」', '『', '』', '％',
];

fn first_line(paragraph: &str) -> &str {
    paragraph.lines().next().unwrap_or("").trim()
}

/// Stage heading: numeral stage, known stage label, or short line with a stage suffix
pub fn is_stage_heading(paragraph: &str) -> bool {
    let line = first_line(paragraph);
    if line.is_empty() {
        return false;
    }
    NUMERAL_STAGE.is_match(line)
        || ENGLISH_STAGE.is_match(line)
        || STAGE_LABELS.contains(&line)
        || (line.chars().count() <= STAGE_SUFFIX_MAX_CHARS
            && STAGE_SUFFIXES.iter().any(|s| line.ends_with(s)))
}

/// First line starts with an enumeration marker
pub fn is_enumerated_heading(paragraph: &str) -> bool {
    ENUMERATED.is_match(first_line(paragraph))
}

/// Line starts with an enumeration marker (used for classification bonuses)
pub fn has_enumerated_line(paragraph: &str) -> bool {
    paragraph.lines().any(|l| ENUMERATED.is_match(l.trim()))
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || CJK_PUNCTUATION.contains(&c)
}

/// Heading-like fragment: ≤6 chars, starts with a letter/ideograph, no punctuation
pub fn is_short_heading(paragraph: &str) -> bool {
    let text = paragraph.trim();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {}
        _ => return false,
    }
    text.chars().count() <= SHORT_HEADING_MAX_CHARS && !text.chars().any(is_punctuation)
}

pub fn is_heading(paragraph: &str) -> bool {
    is_stage_heading(paragraph) || is_enumerated_heading(paragraph) || is_short_heading(paragraph)
}

pub fn ends_with_terminal(paragraph: &str) -> bool {
    paragraph
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| SENTENCE_TERMINALS.contains(&c))
}

fn absorb(target: &mut String, next: &str) {
    target.push('\n');
    target.push_str(next);
}

/// A stage heading absorbs everything up to the next stage heading
pub fn merge_stage_blocks(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(paragraphs.len());
    let mut iter = paragraphs.into_iter().peekable();

    while let Some(mut paragraph) = iter.next() {
        if is_stage_heading(&paragraph) {
            while let Some(next) = iter.next_if(|n| !is_stage_heading(n)) {
                absorb(&mut paragraph, &next);
            }
        }
        merged.push(paragraph);
    }

    merged
}

/// An enumerated heading absorbs the next paragraph unless it is a heading
pub fn merge_enumerations(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(paragraphs.len());
    let mut iter = paragraphs.into_iter().peekable();

    while let Some(mut paragraph) = iter.next() {
        if is_enumerated_heading(&paragraph) {
            if let Some(next) = iter.next_if(|n| !is_heading(n)) {
                absorb(&mut paragraph, &next);
            }
        }
        merged.push(paragraph);
    }

    merged
}

/// A short heading-like fragment absorbs the next paragraph
pub fn merge_short_headings(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(paragraphs.len());
    let mut iter = paragraphs.into_iter();

    while let Some(mut paragraph) = iter.next() {
        if is_short_heading(&paragraph) {
            if let Some(next) = iter.next() {
                absorb(&mut paragraph, &next);
            }
        }
        merged.push(paragraph);
    }

    merged
}

/// A paragraph without terminal punctuation absorbs the next one, once
pub fn merge_unfinished(paragraphs: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(paragraphs.len());
    let mut iter = paragraphs.into_iter().peekable();

    while let Some(mut paragraph) = iter.next() {
        if !ends_with_terminal(&paragraph) {
            if let Some(next) = iter.next_if(|n| !is_heading(n)) {
                absorb(&mut paragraph, &next);
            }
        }
        merged.push(paragraph);
    }

    merged
}

/// Run every merge pass in order
pub fn merge_all(paragraphs: Vec<String>) -> Vec<String> {
    let paragraphs = merge_stage_blocks(paragraphs);
    let paragraphs = merge_enumerations(paragraphs);
    let paragraphs = merge_short_headings(paragraphs);
    merge_unfinished(paragraphs)
}
