//! Composes context selection, answer generation and the branch tree.
//!
//! A question goes through three steps: the selector picks context from the
//! document, the generator answers, and only then is a branch appended. Any
//! failure before the last step leaves the tree and its current branch as
//! they were.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::generator::AnswerGenerator;
use crate::models::Exchange;
use crate::summary::{self, QaPair, SummaryOptions};
use crate::text::prepare::{prepare_document_text, truncate_text};
use crate::text::select_context;
use crate::tree::{BranchTree, TreeError};

/// Upper bound on document text sent for a whole-document summary.
const MAX_SUMMARY_INPUT_CHARS: usize = 100_000;

#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn AnswerGenerator>,
    retrieval: RetrievalConfig,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn AnswerGenerator>, retrieval: RetrievalConfig) -> Self {
        Self {
            generator,
            retrieval,
        }
    }

    pub fn retrieval(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Answer `question` about `document_text` and record the exchange as a
    /// child of `current_id`, or as a new root when `current_id` is `None`.
    ///
    /// The new branch becomes current. Generator failures are returned as
    /// [`Error::Generation`] and nothing is recorded.
    pub async fn ask(
        &self,
        tree: &mut BranchTree,
        document_text: &str,
        question: &str,
        current_id: Option<Uuid>,
    ) -> Result<Exchange> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }
        if let Some(parent_id) = current_id {
            if !tree.contains(parent_id) {
                return Err(TreeError::ParentNotFound(parent_id).into());
            }
        }

        let context = select_context(document_text, question, self.retrieval.max_context_length);
        if context.is_empty() {
            debug!("No relevant context found, asking with the question alone");
        }

        let answer = self.generator.generate_answer(question, &context).await?;

        let id = tree.create_branch(current_id, question, answer.clone())?;
        info!(branch_id = %id, parent_id = ?current_id, "Recorded new branch");

        Ok(Exchange {
            id,
            question: question.to_string(),
            answer,
        })
    }

    /// Summarize the conversation from the root down to `branch_id`.
    pub async fn summarize_path(
        &self,
        tree: &BranchTree,
        branch_id: Uuid,
        options: &SummaryOptions,
    ) -> Result<String> {
        let path = tree.get_branch_path(branch_id);
        if path.is_empty() {
            return Err(Error::BranchNotFound(branch_id));
        }

        let pairs: Vec<QaPair> = path.into_iter().map(QaPair::from).collect();
        let prompt = summary::summary_prompt(&pairs, options);
        self.summarize(&prompt).await
    }

    /// Summarize a whole document.
    pub async fn summarize_document(&self, document_text: &str) -> Result<String> {
        let prepared = truncate_text(&prepare_document_text(document_text), MAX_SUMMARY_INPUT_CHARS);
        let prompt = summary::document_summary_prompt(&prepared);
        self.summarize(&prompt).await
    }

    /// Generate a summary and warn when it falls outside the usable range.
    /// Such summaries are still returned so the user can edit them.
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let text = self.generator.summarize(prompt).await?;
        if !summary::validate_summary(&text) {
            warn!(
                chars = text.chars().count(),
                words = text.split_whitespace().count(),
                "Generated summary is outside the expected length"
            );
        }
        Ok(text)
    }
}
