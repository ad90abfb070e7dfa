//! Lexical context selection.
//!
//! A document is split into paragraphs on blank lines. Each paragraph is scored
//! by counting whole-word, case-insensitive occurrences of the query's longer
//! words, and the best paragraphs are packed into a bounded context string.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::ScoredPassage;

pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 10_000;

/// Query words of this many characters or fewer are ignored.
const MAX_IGNORED_TOKEN_CHARS: usize = 3;

const SEPARATOR: &str = "\n\n";

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

/// Lowercase the query, drop punctuation and keep words longer than three
/// characters. Repeated words are kept and count once per repetition.
pub fn tokenize_query(query: &str) -> Vec<String> {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_IGNORED_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Split text into paragraphs on blank-line boundaries.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

/// Score every paragraph of `document_text` against `query`, in document order.
pub fn score_passages<'a>(document_text: &'a str, query: &str) -> Vec<ScoredPassage<'a>> {
    let patterns: Vec<Regex> = tokenize_query(query)
        .iter()
        .filter_map(|token| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(token))).ok())
        .collect();

    split_paragraphs(document_text)
        .into_iter()
        .map(|text| ScoredPassage {
            text,
            score: patterns.iter().map(|re| re.find_iter(text).count()).sum(),
        })
        .collect()
}

/// Build a context string of at most `max_context_length` characters.
///
/// Paragraphs with a positive score are appended best-first, each followed by
/// a blank line, until the next one would not fit. Selection stops at that
/// paragraph rather than looking for a smaller one further down. Equal scores
/// keep document order. Returns an empty string when nothing matches, in which
/// case callers prompt with the question alone.
pub fn select_context(document_text: &str, query: &str, max_context_length: usize) -> String {
    let mut passages = score_passages(document_text, query);
    passages.sort_by(|a, b| b.score.cmp(&a.score));

    let mut context = String::new();
    let mut used = 0;
    let mut selected = 0;

    for passage in passages.iter().take_while(|p| p.score > 0) {
        let cost = passage.text.chars().count() + SEPARATOR.len();
        if used + cost > max_context_length {
            break;
        }
        context.push_str(passage.text);
        context.push_str(SEPARATOR);
        used += cost;
        selected += 1;
    }

    debug!(
        paragraphs = passages.len(),
        selected,
        chars = used,
        "selected context"
    );
    context.trim_end().to_string()
}
