//! OpenAI providers for embeddings and tool-calling chat completions
//!
//! Also usable against any server exposing the OpenAI-compatible API by
//! pointing `base_url` at it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::types::{ChatMessage, MessageRole, ToolCall, ToolDefinition};

use super::embedding::EmbeddingProvider;
use super::http::{build_client, join_url, post_json};
use super::llm::ChatModel;

/// Default OpenAI API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embedding provider
pub struct OpenAiEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiEmbedder {
    /// Create a new OpenAI embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("OpenAI embeddings require an API key"))?;

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = join_url(&self.base_url, "embeddings");
        let request = EmbeddingsRequest {
            model: &self.model,
            input: text,
        };

        let response: EmbeddingsResponse =
            post_json(self.client.post(&url).bearer_auth(&self.api_key), &request)
                .await
                .map_err(|f| f.into_error("OpenAI embedding request", self.timeout_secs, Error::retrieval))?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::retrieval("OpenAI returned no embedding"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

fn to_wire(message: &ChatMessage) -> WireMessage {
    let content = if message.role == MessageRole::Assistant
        && message.has_tool_calls()
        && message.content.is_empty()
    {
        None
    } else {
        Some(message.content.clone())
    };

    WireMessage {
        role: message.role.as_str().to_string(),
        content,
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                kind: function_kind(),
                function: WireFunction {
                    name: call.name.clone(),
                    arguments: call.arguments.to_string(),
                },
            })
            .collect(),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn from_wire(response: CompletionResponse) -> Result<ChatMessage> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| Error::model("OpenAI response has no choices"))?;

    // Undecodable arguments are passed through as a string so the agent can
    // report the problem back to the model.
    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall {
            arguments: serde_json::from_str(&call.function.arguments)
                .unwrap_or(serde_json::Value::String(call.function.arguments)),
            id: call.id,
            name: call.function.name,
        })
        .collect();

    Ok(ChatMessage::assistant_tool_calls(
        message.content.unwrap_or_default(),
        tool_calls,
    ))
}

/// OpenAI chat completions provider (gpt-4o-mini by default)
pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

impl OpenAiChat {
    /// Create a new OpenAI chat provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("OpenAI chat requires an API key"))?;

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage> {
        let url = join_url(&self.base_url, "chat/completions");
        let request = CompletionRequest {
            model: &self.model,
            messages: messages.iter().map(to_wire).collect(),
            tools: tools
                .iter()
                .map(|function| WireTool {
                    kind: "function",
                    function,
                })
                .collect(),
            temperature: self.temperature,
        };

        tracing::debug!("OpenAI chat: {} messages, model {}", messages.len(), self.model);

        let response: CompletionResponse =
            post_json(self.client.post(&url).bearer_auth(&self.api_key), &request)
                .await
                .map_err(|f| f.into_error("OpenAI chat request", self.timeout_secs, Error::model))?;

        from_wire(response)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
