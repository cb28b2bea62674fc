//! Error types for the documentation assistant

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Assistant errors
///
/// The pipeline never recovers from these on its own: every failure of an
/// external dependency reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// Similarity index or embedding provider unreachable, or returned an unusable result
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Language model provider failed
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Agent loop used up its tool round trips without a final answer
    #[error("Agent stalled: no final answer after {rounds} tool round trips")]
    AgentStalled { rounds: usize },

    /// An external call or the whole run exceeded its deadline
    #[error("Timed out after {secs}s during {operation}")]
    Timeout { operation: String, secs: u64 },

    /// Caller supplied unusable input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

impl Error {
    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::RetrievalUnavailable(message.into())
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            secs,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Stable machine-readable kind, used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::RetrievalUnavailable(_) => "retrieval_unavailable",
            Error::ModelUnavailable(_) => "model_unavailable",
            Error::AgentStalled { .. } => "agent_stalled",
            Error::Timeout { .. } => "timeout",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::TomlParsing(_) => "toml_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::RetrievalUnavailable(_) | Error::ModelUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::AgentStalled { .. }
            | Error::Config(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParsing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
