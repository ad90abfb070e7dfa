use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ingested document: its extracted text plus per-page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub full_text: String,
    pub page_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Lightweight document listing entry (no text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    pub page_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            page_count: doc.page_count,
            created_at: doc.created_at,
        }
    }
}

/// Text of a single page, numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub page_number: u32,
    pub text: String,
}

/// Input for creating a document from already extracted text.
///
/// When `pages` is empty the whole `text` is stored as a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentInput {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

/// Query parameters for chunk listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkQuery {
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
}

/// Input for previewing the context selected for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInput {
    pub question: String,
    pub max_context_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponse {
    pub context: String,
}
