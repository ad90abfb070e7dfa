//! Answer generation.
//!
//! The generative model is an injected collaborator behind
//! [`AnswerGenerator`]. [`gemini::GeminiClient`] talks to the Gemini REST API;
//! tests substitute their own implementations.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiClient, GeminiConfig};

/// Answer generation errors.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("No API key configured for the answer provider")]
    MissingApiKey,
}

/// Produces an answer for a question given selected document context.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// `context` is empty when no passage of the document matched; the
    /// question is then answered on its own.
    async fn generate_answer(&self, question: &str, context: &str)
        -> Result<String, GenerationError>;

    /// Run a complete summary prompt. Providers with a separate output
    /// budget for summaries override this.
    async fn summarize(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate_answer(prompt, "").await
    }
}

/// Build the single-turn prompt sent to a text model.
pub fn build_prompt(question: &str, context: &str) -> String {
    if context.is_empty() {
        question.to_string()
    } else {
        format!(
            "Context information:\n{}\n\nQuestion: {}\n\nAnswer based on the context provided:",
            context, question
        )
    }
}
