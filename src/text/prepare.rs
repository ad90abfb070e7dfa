//! Cleanup helpers applied around answer generation.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static ASSISTANT_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(As an AI|I am an AI|As a language model).+?\n")
        .expect("preamble pattern is valid")
});

/// Cut `text` to `max_chars` characters, marking the cut with `"..."`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
    }
}

/// Flatten text for whole-document prompts: every whitespace run becomes a
/// single space and control characters are removed.
///
/// Paragraph structure is lost, so never use this before chunking or context
/// selection.
pub fn prepare_document_text(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, " ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// Strip a leading "As an AI ..." style line from a generated answer and trim it.
pub fn format_answer(raw: &str) -> String {
    ASSISTANT_PREAMBLE.replace(raw, "").trim().to_string()
}
