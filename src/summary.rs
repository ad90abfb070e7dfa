//! Prompt building and post-processing for conversation summaries.

use serde::{Deserialize, Serialize};

use crate::models::Branch;

const DEFAULT_SUMMARY_MAX_LENGTH: usize = 500;
const MIN_KEY_POINT_CHARS: usize = 20;

/// Title length for summaries named after a branch question.
pub const TITLE_CHARS: usize = 60;
const TRANSITION_WORDS: [&str; 4] = ["however", "additionally", "moreover", "furthermore"];

/// A question and its answer, as fed to a summary prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl From<&Branch> for QaPair {
    fn from(branch: &Branch) -> Self {
        Self {
            question: branch.question.clone(),
            answer: branch.answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    /// Topics the summary should pay particular attention to.
    pub focus_areas: Vec<String>,
    /// Requested upper bound on summary length, in characters.
    pub max_length: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            focus_areas: Vec::new(),
            max_length: DEFAULT_SUMMARY_MAX_LENGTH,
        }
    }
}

/// Number the pairs as `1. Question: ...` / `   Answer: ...` blocks.
pub fn format_qa_for_summary(pairs: &[QaPair]) -> String {
    pairs
        .iter()
        .enumerate()
        .map(|(i, qa)| format!("{}. Question: {}\n   Answer: {}", i + 1, qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn summary_prompt(pairs: &[QaPair], options: &SummaryOptions) -> String {
    let mut prompt = String::from("Please provide a concise summary of the following Q&A session:\n\n");
    prompt.push_str(&format_qa_for_summary(pairs));

    prompt.push_str("\n\nIn your summary:");
    prompt.push_str("\n- Focus on the main points and key insights");
    prompt.push_str("\n- Highlight any important conclusions");
    if !options.focus_areas.is_empty() {
        prompt.push_str(&format!(
            "\n- Pay special attention to these areas: {}",
            options.focus_areas.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "\n- Keep the summary under {} characters",
        options.max_length
    ));
    prompt
}

pub fn document_summary_prompt(document_text: &str) -> String {
    format!(
        "Please provide a concise summary of the following document content:\n\n{}\n\nSummary:",
        document_text
    )
}

/// Sentences of a summary that read like standalone key points.
pub fn extract_key_points(summary: &str) -> Vec<String> {
    summary
        .split(&['.', '!', '?'][..])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_KEY_POINT_CHARS)
        .filter(|s| {
            let lower = s.to_lowercase();
            !TRANSITION_WORDS.iter().any(|w| lower.starts_with(w))
        })
        .map(str::to_string)
        .collect()
}

/// A usable summary has 100 to 2000 characters and at least 20 words.
pub fn validate_summary(summary: &str) -> bool {
    let chars = summary.chars().count();
    (100..=2000).contains(&chars) && summary.split(' ').count() >= 20
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair {
                question: "What is the capital?".into(),
                answer: "Paris.".into(),
            },
            QaPair {
                question: "How big is it?".into(),
                answer: "About two million people.".into(),
            },
        ]
    }

    #[test]
    fn test_format_qa_for_summary() {
        assert_eq!(
            format_qa_for_summary(&pairs()),
            "1. Question: What is the capital?\n   Answer: Paris.\n\n2. Question: How big is it?\n   Answer: About two million people."
        );
    }

    #[test]
    fn test_summary_prompt_includes_options() {
        let prompt = summary_prompt(
            &pairs(),
            &SummaryOptions {
                focus_areas: vec!["geography".into(), "population".into()],
                max_length: 300,
            },
        );
        assert!(prompt.contains("2. Question: How big is it?"));
        assert!(prompt.contains("these areas: geography, population"));
        assert!(prompt.ends_with("under 300 characters"));

        let plain = summary_prompt(&pairs(), &SummaryOptions::default());
        assert!(!plain.contains("special attention"));
        assert!(plain.ends_with("under 500 characters"));
    }

    #[test]
    fn test_extract_key_points() {
        let summary = "Paris is the capital of France. However the question was odd. Short one. \
                       The population is roughly two million!";
        assert_eq!(
            extract_key_points(summary),
            vec![
                "Paris is the capital of France".to_string(),
                "The population is roughly two million".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_summary() {
        assert!(!validate_summary("Too short."));
        let ok = "word ".repeat(25);
        assert!(validate_summary(&ok));
        let long = "word ".repeat(500);
        assert!(!validate_summary(&long));
    }
}
