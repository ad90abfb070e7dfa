mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::orchestrator::Orchestrator;

pub use handlers::{MergeHighlightsInput, SummaryResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(db: Database, orchestrator: Orchestrator) -> Self {
        Self { db, orchestrator }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Documents
        .route("/documents", get(handlers::list_documents))
        .route("/documents", post(handlers::create_document))
        .route("/documents/{id}", get(handlers::get_document))
        .route("/documents/{id}", delete(handlers::delete_document))
        .route("/documents/{id}/pages", get(handlers::get_document_pages))
        .route("/documents/{id}/chunks", get(handlers::get_document_chunks))
        .route("/documents/{id}/sections", get(handlers::get_document_sections))
        .route("/documents/{id}/context", post(handlers::select_document_context))
        .route("/documents/{id}/summary", post(handlers::summarize_document))
        .route("/documents/{id}/summaries", get(handlers::list_summaries))
        // Conversation branches
        .route("/documents/{id}/ask", post(handlers::ask))
        .route("/documents/{id}/branches", get(handlers::get_branch_tree))
        .route(
            "/documents/{id}/branches/{branch_id}",
            delete(handlers::delete_branch),
        )
        .route(
            "/documents/{id}/branches/{branch_id}/path",
            get(handlers::get_branch_path),
        )
        .route(
            "/documents/{id}/branches/{branch_id}/summary",
            post(handlers::summarize_branch),
        )
        // Highlights
        .route("/documents/{id}/highlights", get(handlers::list_highlights))
        .route("/documents/{id}/highlights", post(handlers::create_highlight))
        .route(
            "/documents/{id}/highlights/merge",
            post(handlers::merge_highlights),
        )
        .route("/highlights/{id}", put(handlers::update_highlight))
        .route("/highlights/{id}", delete(handlers::delete_highlight))
        // Summaries
        .route("/summaries/{id}", get(handlers::get_summary))
        .route("/summaries/{id}", put(handlers::update_summary))
        .route("/summaries/{id}", delete(handlers::delete_summary))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
