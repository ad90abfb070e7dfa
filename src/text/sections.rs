//! Best-effort document structuring into headed sections.
//!
//! Heading detection is a heuristic and sits behind [`SectionClassifier`] so a
//! better classifier can replace it. Chunking and context selection do not use
//! this module.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_HEADING_CHARS: usize = 100;
const SHORT_HEADING_CHARS: usize = 50;
const DEFAULT_SECTION_TITLE: &str = "Introduction";

static TITLE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]*([ \t][A-Z][a-z]*)*$").expect("title case pattern is valid")
});

/// A titled run of document lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    /// 0 for the implicit leading section, 1..=3 for detected headings.
    pub level: u8,
}

/// Decides whether a line is a heading and at which level.
pub trait SectionClassifier {
    /// Heading level for `line`, or `None` for body text. `line` is trimmed
    /// and non-empty.
    fn classify(&self, line: &str) -> Option<u8>;
}

/// Short lines without closing punctuation that are all caps or Title Case.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl SectionClassifier for HeuristicClassifier {
    fn classify(&self, line: &str) -> Option<u8> {
        let chars = line.chars().count();
        let ends_open = !line.ends_with(&['.', '!', '?'][..]) || line.ends_with(':');
        let all_caps = line == line.to_uppercase();

        if chars >= MAX_HEADING_CHARS || !ends_open || !(all_caps || TITLE_CASE.is_match(line)) {
            return None;
        }

        Some(if all_caps {
            1
        } else if chars < SHORT_HEADING_CHARS {
            2
        } else {
            3
        })
    }
}

/// Group the lines of `text` into sections using `classifier`.
///
/// Body lines seen before the first heading form an "Introduction" section at
/// level 0. Blank lines are skipped.
pub fn structure_sections(text: &str, classifier: &dyn SectionClassifier) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(level) = classifier.classify(line) {
            sections.extend(current.take());
            current = Some(Section {
                title: line.to_string(),
                content: String::new(),
                level,
            });
            continue;
        }

        match current.as_mut() {
            Some(section) => {
                if !section.content.is_empty() {
                    section.content.push('\n');
                }
                section.content.push_str(line);
            }
            None => {
                current = Some(Section {
                    title: DEFAULT_SECTION_TITLE.to_string(),
                    content: line.to_string(),
                    level: 0,
                });
            }
        }
    }

    sections.extend(current);
    sections
}
