//! API routes for the gateway

pub mod chat;
pub mod models;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// OpenAI-compatible routes, nested under `/openai`
pub fn openai_routes() -> Router<AppState> {
    Router::new()
        .route("/:database/v1/chat/completions", post(chat::chat_completions))
        // Models is required for the chatbot-ui to show what models are available
        .route("/:database/v1/models", get(models::list_models))
}

/// Gateway info routes, nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let retrieval = state.pipeline().retrieval();

    Json(serde_json::json!({
        "name": "rag-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Retrieval-augmented chat completion gateway with source citations",
        "endpoints": {
            "POST /openai/:database/v1/chat/completions": "Chat completion with retrieved context (JSON or event stream)",
            "GET /openai/:database/v1/models": "Completion backend model listing",
            "GET /healthz": "Liveness check"
        },
        "retrieval": {
            "class_name": state.config().retrieval.class_name,
            "query_count": retrieval.query_count(),
            "score_threshold": retrieval.score_threshold()
        }
    }))
}
