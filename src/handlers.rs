use crate::chat::ChatService;
use crate::chat_models::{ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::models::{Institution, InstitutionQuery};
use crate::store::InstitutionStore;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// The in-memory institution dataset.
    pub store: Arc<InstitutionStore>,
    /// The chat gateway.
    pub chat: ChatService,
}

/// Assembles the application router. Kept separate from `main` so
/// integration tests can drive the full HTTP surface with `tower::oneshot`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/institutions", get(list_institutions))
        .route("/api/chat", post(chat))
        .with_state(state)
}

/// GET /
///
/// Liveness check.
pub async fn root() -> &'static str {
    "CHED API is running. Go to /api/institutions to see data."
}

/// GET /health
///
/// Health check endpoint, including dataset readiness.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "ched-chat-api",
        "version": "0.1.0",
        "dataset_ready": state.store.is_ready(),
        "institutions": state.store.count(),
    }))
}

/// GET /api/institutions
///
/// Returns the full institution list, optionally filtered by a
/// case-insensitive `search` substring on the name field. Answers 503 until
/// ingestion has published the dataset.
pub async fn list_institutions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InstitutionQuery>,
) -> Result<Json<Vec<Institution>>, AppError> {
    if !state.store.is_ready() {
        return Err(AppError::ServiceUnavailable(
            "Institution data is still loading. Please try again shortly.".to_string(),
        ));
    }

    let institutions: Vec<Institution> = match &params.search {
        Some(needle) => state
            .store
            .filter_by_name(needle)
            .into_iter()
            .cloned()
            .collect(),
        None => state.store.snapshot().unwrap_or_default().to_vec(),
    };

    Ok(Json(institutions))
}

/// POST /api/chat
///
/// Answers a conversation. Every recoverable path returns 200 with text;
/// the only caller-visible error from the gateway is 400 for an empty
/// conversation.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let text = state.chat.answer(&request).await?;
    Ok(Json(ChatResponse { text }))
}
