use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated summary, editable after the fact.
///
/// `branch_id` is `None` for a whole-document summary and otherwise names the
/// branch whose root-to-node conversation was summarized. There is at most one
/// summary per document/branch pair; regenerating replaces its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: Uuid,
    pub document_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSummaryInput {
    pub title: Option<String>,
    pub content: Option<String>,
}
