//! Paragraph splitting, cleaning and the post-merge skip filter

use once_cell::sync::Lazy;
use regex::Regex;

/// Page markers and converter headers that carry no content
static STRUCTURAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:
            [-—–]+\s*\d{1,4}\s*[-—–]+                                 # - 12 -
          | 第\s*\d+\s*页(?:\s*[/／,，]?\s*共\s*\d+\s*页)?            # 第3页 / 第3页共10页
          | (?:page|p\.)\s*\d+(?:\s*(?:of|/)\s*\d+)?                 # Page 3 of 10
          | \[\s*(?:normali[sz]ed|converted|source)\b[^\]]*\]        # [normalized from x.docx]
          | =+\s*(?:page\s*\d+|normali[sz]ed[^=]*)\s*=+              # === page 3 ===
        )$",
    )
    .unwrap()
});

/// Undecorated page number; only a marker when it is the whole paragraph
static BARE_PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}$").unwrap());

/// Comment/endorsement chrome copied along with web articles
static UI_CHROME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:点赞|赞|评论|回复|转发|收藏|分享|阅读原文|写留言|留言|在看|likes?|repl(?:y|ies)|comments?|share)\s*[:：]?\s*[\d,.万kK+]*\s*)+$",
    )
    .unwrap()
});

const CHECKBOX_SYMBOLS: &[char] = &['□', '■', '☐', '☑', '☒', '✓', '✔', '✗', '✘'];

const CHECKBOX_MAX_CHARS: usize = 15;

/// Administrative phrases; only disqualifying in short paragraphs
const BOILERPLATE_PHRASES: &[&str] = &[
    "联系人",
    "联系电话",
    "联系方式",
    "邮编",
    "邮箱",
    "地址：",
    "盖章",
    "签字",
    "签名",
    "填表说明",
    "年 月 日",
    "附件",
    "contact",
    "signature",
    "attachment",
    "tel:",
    "e-mail",
];

const BOILERPLATE_MAX_CHARS: usize = 30;

/// Split raw text on blank lines (lines empty after trimming)
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}

/// Trim lines and drop empty lines and structural markers
///
/// Returns `None` when nothing survives.
pub fn clean_paragraph(paragraph: &str) -> Option<String> {
    let lines: Vec<&str> = paragraph
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_structural_marker(line))
        .collect();

    if lines.is_empty() || (lines.len() == 1 && BARE_PAGE_NUMBER.is_match(lines[0])) {
        None
    } else {
        Some(lines.join("\n"))
    }
}

pub fn is_structural_marker(line: &str) -> bool {
    STRUCTURAL_MARKER.is_match(line.trim())
}

/// Whether a merged paragraph should be discarded before classification
pub fn should_skip(paragraph: &str) -> bool {
    let trimmed = paragraph.trim();
    let char_count = trimmed.chars().count();

    if trimmed.chars().filter(|c| !c.is_whitespace()).count() < 2 {
        return true;
    }

    if !trimmed.chars().any(char::is_alphanumeric) {
        return true;
    }

    if char_count <= CHECKBOX_MAX_CHARS && trimmed.contains(CHECKBOX_SYMBOLS) {
        return true;
    }

    if char_count <= BOILERPLATE_MAX_CHARS {
        let lowered = trimmed.to_lowercase();
        if BOILERPLATE_PHRASES.iter().any(|p| lowered.contains(p)) {
            return true;
        }
    }

    trimmed.lines().all(|line| UI_CHROME_LINE.is_match(line.trim()))
}
