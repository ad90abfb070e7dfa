use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question/answer exchange in a branching conversation.
///
/// Branches form a forest via `parent_id`: a `None` parent makes the branch a
/// root, and several roots may coexist for the same document. Siblings are
/// alternate follow-ups to the same exchange. A branch is never edited after
/// creation; it only disappears when it or one of its ancestors is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl Branch {
    pub fn new(parent_id: Option<Uuid>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            question: question.into(),
            answer: answer.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A branch with its nested children, used for tree responses.
///
/// The `branch` fields are flattened into the JSON response, with an additional
/// `children` array containing nested `BranchNode` objects in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    #[serde(flatten)]
    pub branch: Branch,
    pub children: Vec<BranchNode>,
}

/// Input for asking a question about a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskInput {
    pub question: String,
    /// Branch to continue from. `None` starts a new root branch.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// The outcome of one orchestrated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Id of the branch recorded for this exchange.
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

impl From<&Branch> for Exchange {
    fn from(branch: &Branch) -> Self {
        Self {
            id: branch.id,
            question: branch.question.clone(),
            answer: branch.answer.clone(),
        }
    }
}
