use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::db::Database;
use crate::error::Error;
use crate::highlight::HighlightSet;
use crate::models::*;
use crate::summary::{self, extract_key_points, validate_summary, SummaryOptions};
use crate::text::prepare::truncate_text;
use crate::text::sections::{structure_sections, HeuristicClassifier, Section};
use crate::text::{chunk, select_context, ChunkOptions};

type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Map orchestration failures onto HTTP statuses. Generator failures are
/// reported as a bad gateway since the fault lies with the upstream model.
fn orchestration_error(e: Error) -> ApiError {
    match e {
        Error::EmptyQuestion => (StatusCode::BAD_REQUEST, e.to_string()),
        e if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
        Error::Generation(inner) => {
            tracing::error!("Answer generation failed: {}", inner);
            (
                StatusCode::BAD_GATEWAY,
                "Answer generation failed".to_string(),
            )
        }
        other => internal_error(other),
    }
}

fn load_document(db: &Database, id: Uuid) -> Result<Document, ApiError> {
    db.get_document(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Document not found".to_string()))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Documents
// ============================================================

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentSummary>>, ApiError> {
    state.db.list_documents().map(Json).map_err(internal_error)
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<CreateDocumentInput>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    if input.text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Document text is empty".to_string()));
    }
    state
        .db
        .create_document(input)
        .map(|d| (StatusCode::CREATED, Json(d)))
        .map_err(internal_error)
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    load_document(&state.db, id).map(Json)
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_document(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Document not found".to_string()))
    }
}

pub async fn get_document_pages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DocumentPage>>, ApiError> {
    load_document(&state.db, id)?;
    state.db.get_document_pages(id).map(Json).map_err(internal_error)
}

pub async fn get_document_chunks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChunkQuery>,
) -> Result<Json<Vec<Chunk>>, ApiError> {
    let document = load_document(&state.db, id)?;
    let defaults = state.orchestrator.retrieval().chunk_options();
    let options = ChunkOptions {
        chunk_size: query.chunk_size.unwrap_or(defaults.chunk_size),
        overlap: query.overlap.unwrap_or(defaults.overlap),
    };
    if options.chunk_size == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "chunk_size must be positive".to_string(),
        ));
    }
    Ok(Json(chunk(&document.full_text, options)))
}

pub async fn get_document_sections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Section>>, ApiError> {
    let document = load_document(&state.db, id)?;
    Ok(Json(structure_sections(
        &document.full_text,
        &HeuristicClassifier,
    )))
}

pub async fn select_document_context(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ContextInput>,
) -> Result<Json<ContextResponse>, ApiError> {
    let document = load_document(&state.db, id)?;
    let max = input
        .max_context_length
        .unwrap_or(state.orchestrator.retrieval().max_context_length);
    Ok(Json(ContextResponse {
        context: select_context(&document.full_text, &input.question, max),
    }))
}

/// A stored summary with the key points pulled out of its text.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub key_points: Vec<String>,
    /// Whether the text meets the expected summary length.
    pub valid: bool,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            key_points: extract_key_points(&summary.content),
            valid: validate_summary(&summary.content),
            summary,
        }
    }
}

pub async fn summarize_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let document = load_document(&state.db, id)?;
    let content = state
        .orchestrator
        .summarize_document(&document.full_text)
        .await
        .map_err(orchestration_error)?;
    let saved = state
        .db
        .save_summary(id, None, &document.title, &content)
        .map_err(internal_error)?;
    Ok(Json(saved.into()))
}

pub async fn list_summaries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SummaryResponse>>, ApiError> {
    load_document(&state.db, id)?;
    let summaries = state.db.get_summaries(id).map_err(internal_error)?;
    Ok(Json(summaries.into_iter().map(SummaryResponse::from).collect()))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    state
        .db
        .get_summary(id)
        .map_err(internal_error)?
        .map(|s| Json(s.into()))
        .ok_or((StatusCode::NOT_FOUND, "Summary not found".to_string()))
}

pub async fn update_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSummaryInput>,
) -> Result<Json<SummaryResponse>, ApiError> {
    if input.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err((StatusCode::BAD_REQUEST, "Summary content is empty".to_string()));
    }
    state
        .db
        .update_summary(id, input)
        .map_err(internal_error)?
        .map(|s| Json(s.into()))
        .ok_or((StatusCode::NOT_FOUND, "Summary not found".to_string()))
}

pub async fn delete_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_summary(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Summary not found".to_string()))
    }
}

// ============================================================
// Branches
// ============================================================

/// Ask a question about a document. The exchange is stored only after the
/// answer has been generated.
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AskInput>,
) -> Result<(StatusCode, Json<Exchange>), ApiError> {
    let document = load_document(&state.db, id)?;
    let mut tree = state.db.load_branch_tree(id).map_err(internal_error)?;

    let exchange = state
        .orchestrator
        .ask(&mut tree, &document.full_text, &input.question, input.parent_id)
        .await
        .map_err(orchestration_error)?;

    let branch = tree
        .get(exchange.id)
        .ok_or_else(|| internal_error("new branch missing from tree"))?;
    state.db.insert_branch(id, branch).map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(exchange)))
}

pub async fn get_branch_tree(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<BranchNode>>, ApiError> {
    load_document(&state.db, id)?;
    let tree = state.db.load_branch_tree(id).map_err(internal_error)?;
    Ok(Json(tree.forest()))
}

pub async fn get_branch_path(
    State(state): State<AppState>,
    Path((id, branch_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Branch>>, ApiError> {
    let tree = state.db.load_branch_tree(id).map_err(internal_error)?;
    let path: Vec<Branch> = tree
        .get_branch_path(branch_id)
        .into_iter()
        .cloned()
        .collect();
    if path.is_empty() {
        return Err((StatusCode::NOT_FOUND, "Branch not found".to_string()));
    }
    Ok(Json(path))
}

pub async fn delete_branch(
    State(state): State<AppState>,
    Path((id, branch_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let mut tree = state.db.load_branch_tree(id).map_err(internal_error)?;
    let removed = tree.delete_branch(branch_id);
    if removed.is_empty() {
        return Err((StatusCode::NOT_FOUND, "Branch not found".to_string()));
    }
    state.db.delete_branches(&removed).map_err(internal_error)?;
    tracing::info!(branch_id = %branch_id, removed = removed.len(), "Deleted branch subtree");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summarize_branch(
    State(state): State<AppState>,
    Path((id, branch_id)): Path<(Uuid, Uuid)>,
    Json(options): Json<SummaryOptions>,
) -> Result<Json<SummaryResponse>, ApiError> {
    load_document(&state.db, id)?;
    let tree = state.db.load_branch_tree(id).map_err(internal_error)?;
    let content = state
        .orchestrator
        .summarize_path(&tree, branch_id, &options)
        .await
        .map_err(orchestration_error)?;

    let title = tree
        .get(branch_id)
        .map(|b| truncate_text(&b.question, summary::TITLE_CHARS))
        .unwrap_or_default();
    let saved = state
        .db
        .save_summary(id, Some(branch_id), &title, &content)
        .map_err(internal_error)?;
    Ok(Json(saved.into()))
}

// ============================================================
// Highlights
// ============================================================

pub async fn list_highlights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<HighlightRegion>>, ApiError> {
    load_document(&state.db, id)?;
    state.db.get_highlights(id).map(Json).map_err(internal_error)
}

pub async fn create_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateHighlightInput>,
) -> Result<(StatusCode, Json<HighlightRegion>), ApiError> {
    let document = load_document(&state.db, id)?;
    let page = input.selection.page_number;
    if page == 0 || page > document.page_count {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Page {} is outside the document", page),
        ));
    }

    let mut set = HighlightSet::from_regions(state.db.get_highlights(id).map_err(internal_error)?);
    let region = set
        .add(input.selection, input.color, input.note)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let overlapping = set.overlapping(&region).len();
    if overlapping > 0 {
        tracing::debug!(highlight_id = %region.id, overlapping, "New highlight overlaps existing ones");
    }
    state
        .db
        .insert_highlight(id, &region)
        .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(region)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MergeHighlightsInput {
    /// Highlight that survives the merge.
    pub keep: Uuid,
    pub absorb: Uuid,
}

pub async fn merge_highlights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<MergeHighlightsInput>,
) -> Result<Json<HighlightRegion>, ApiError> {
    if input.keep == input.absorb {
        return Err((
            StatusCode::BAD_REQUEST,
            "Cannot merge a highlight with itself".to_string(),
        ));
    }

    let mut set = HighlightSet::from_regions(state.db.get_highlights(id).map_err(internal_error)?);
    let merged = set
        .merge_pair(input.keep, input.absorb)
        .ok_or((StatusCode::NOT_FOUND, "Highlight not found".to_string()))?;
    state
        .db
        .save_merged_highlight(&merged, input.absorb)
        .map_err(internal_error)?;
    Ok(Json(merged))
}

pub async fn update_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<HighlightUpdate>,
) -> Result<Json<HighlightRegion>, ApiError> {
    state
        .db
        .update_highlight(id, input)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Highlight not found".to_string()))
}

pub async fn delete_highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_highlight(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Highlight not found".to_string()))
    }
}
