//! Errors surfaced by the orchestrated operations.

use thiserror::Error;
use uuid::Uuid;

use crate::generator::GenerationError;
use crate::tree::TreeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl Error {
    /// Whether the error points at something the caller asked for that does
    /// not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BranchNotFound(_) | Self::Tree(TreeError::ParentNotFound(_))
        )
    }
}
