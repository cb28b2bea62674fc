//! API routes for the assistant server

pub mod ask;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::agent::{RETRIEVAL_K, RETRIEVAL_TOOL_NAME};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/info", get(info))
}

/// Service description endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "docs-assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "description": format!(
            "Answers questions about {} documentation with source provenance",
            state.product_name()
        ),
        "endpoints": {
            "POST /ask": "Answer a question; body {query, history?}",
            "GET /health": "Liveness check",
            "GET /info": "This description"
        },
        "retrieval": {
            "tool": RETRIEVAL_TOOL_NAME,
            "passages_per_call": RETRIEVAL_K
        }
    }))
}
