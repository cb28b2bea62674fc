//! Question answering endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::ConversationTurn;

/// Body of `POST /ask`
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Option<Vec<ConversationTurn>>,
}

/// Response of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    /// Unique sources behind the answer, first-seen order
    pub sources: Vec<String>,
}

/// POST /ask - Answer a question about the documentation
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    if request.query.trim().is_empty() {
        return Err(Error::invalid_request("query must not be empty"));
    }

    tracing::info!(
        "Ask: {} chars, {} history turns",
        request.query.len(),
        request.history.as_ref().map_or(0, |h| h.len())
    );

    let result = state
        .pipeline()
        .answer(&request.query, request.history.as_deref())
        .await?;

    Ok(Json(AskResponse {
        sources: result.unique_sources(),
        answer: result.answer,
    }))
}
