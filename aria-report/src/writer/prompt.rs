//! Grounding prompt construction

use aria_common::config::WriterSettings;

use crate::generation::GenerationPrompt;
use crate::outline::OutlineSection;
use crate::types::Segment;

const SYSTEM_TEXT: &str = "You are an expert educational transformation writer. Compose \
well-structured, factual prose, avoiding plagiarism while grounding claims in the provided excerpts.";

const NO_BULLETS: &str = "- (No bullets extracted)";

const NO_EXCERPTS: &str = "(No supporting segments available)";

/// Display name of the requested output language
pub fn instruction_language(language: &str) -> &'static str {
    if language.to_lowercase().starts_with("zh") {
        "中文"
    } else {
        "English"
    }
}

/// Up to `max` segments, stable-sorted by ascending priority
pub fn select_excerpts(segments: &[Segment], max: usize) -> Vec<&Segment> {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.priority);
    ordered.truncate(max);
    ordered
}

/// Build the prompt sent to every generator for one section
pub fn build_prompt(
    section: &OutlineSection,
    excerpts: &[&Segment],
    settings: &WriterSettings,
) -> GenerationPrompt {
    let bullets = section
        .bullet_points
        .iter()
        .filter(|b| !b.is_empty())
        .map(|b| format!("- {}", b))
        .collect::<Vec<_>>()
        .join("\n");
    let excerpt_lines = excerpts
        .iter()
        .map(|s| format!("[{}] {}", s.identifier, s.text))
        .collect::<Vec<_>>()
        .join("\n");

    let user_text = format!(
        "Please draft the section '{title}' in {language}.\n\n\
         Outline anchor points:\n{bullets}\n\n\
         Source excerpts (reference identifiers in brackets where relevant):\n{excerpts}\n\n\
         Write cohesive paragraphs (no bullet lists) that synthesize the ideas, cite identifiers \
         in square brackets when drawing directly from an excerpt, and include transitional \
         language for flow.",
        title = section.title,
        language = instruction_language(&settings.language),
        bullets = if bullets.is_empty() { NO_BULLETS } else { bullets.as_str() },
        excerpts = if excerpt_lines.is_empty() { NO_EXCERPTS } else { excerpt_lines.as_str() },
    );

    GenerationPrompt {
        system_text: SYSTEM_TEXT.to_string(),
        user_text,
        temperature: settings.temperature,
        max_output_tokens: settings.max_output_tokens,
        top_p: settings.top_p,
    }
}
