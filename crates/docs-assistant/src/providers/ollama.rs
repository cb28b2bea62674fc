//! Ollama-based providers for embeddings and tool-calling chat

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::types::{ChatMessage, MessageRole, ToolCall, ToolDefinition};

use super::embedding::EmbeddingProvider;
use super::http::{build_client, join_url, post_json};
use super::llm::ChatModel;

/// Default Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Thin Ollama API client shared by the embedder and chat providers
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
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
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<WireMessage>,
}

impl OllamaClient {
    /// Create a new client
    pub fn new(base_url: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
            timeout_secs,
        })
    }

    /// Generate an embedding
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let url = join_url(&self.base_url, "api/embeddings");
        let request = EmbedRequest { model, prompt: text };

        let response: EmbedResponse = post_json(self.client.post(&url), &request)
            .await
            .map_err(|f| f.into_error("Ollama embedding request", self.timeout_secs, Error::retrieval))?;

        if response.embedding.is_empty() {
            return Err(Error::retrieval("Ollama returned an empty embedding"));
        }

        Ok(response.embedding)
    }

    /// Run one non-streaming chat turn
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: f32,
    ) -> Result<ChatMessage> {
        let url = join_url(&self.base_url, "api/chat");
        let request = ChatRequest {
            model,
            messages: messages.iter().map(to_wire).collect(),
            tools: tools
                .iter()
                .map(|function| WireTool {
                    kind: "function",
                    function,
                })
                .collect(),
            stream: false,
            options: ChatOptions { temperature },
        };

        let response: ChatResponse = post_json(self.client.post(&url), &request)
            .await
            .map_err(|f| f.into_error("Ollama chat request", self.timeout_secs, Error::model))?;

        from_wire(response)
    }
}

fn to_wire(message: &ChatMessage) -> WireMessage {
    WireMessage {
        role: message.role.as_str().to_string(),
        content: message.content.clone(),
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: None,
                function: WireFunction {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            })
            .collect(),
        tool_name: message.tool_name.clone(),
    }
}

fn from_wire(response: ChatResponse) -> Result<ChatMessage> {
    let message = response
        .message
        .ok_or_else(|| Error::model("Ollama chat response has no message"))?;

    if message.role != MessageRole::Assistant.as_str() {
        return Err(Error::model(format!(
            "Ollama chat response has unexpected role '{}'",
            message.role
        )));
    }

    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall {
            id: call.id.unwrap_or_default(),
            name: call.function.name,
            arguments: normalize_arguments(call.function.arguments),
        })
        .collect();

    Ok(ChatMessage::assistant_tool_calls(message.content, tool_calls))
}

/// Some models emit arguments as a JSON-encoded string instead of an object
fn normalize_arguments(arguments: serde_json::Value) -> serde_json::Value {
    match arguments {
        serde_json::Value::String(raw) => {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
        }
        other => other,
    }
}

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(config.base_url.as_deref(), config.timeout_secs)?,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(&self.model, text).await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama chat provider; the model must support tool calling
pub struct OllamaChat {
    client: OllamaClient,
    model: String,
    temperature: f32,
}

impl OllamaChat {
    /// Create a new Ollama chat provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(config.base_url.as_deref(), config.timeout_secs)?,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage> {
        tracing::debug!("Ollama chat: {} messages, model {}", messages.len(), self.model);
        self.client
            .chat(&self.model, messages, tools, self.temperature)
            .await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetrievedPassage;
    use serde_json::json;

    #[test]
    fn test_parse_final_answer() {
        let response: ChatResponse = serde_json::from_value(json!({
            "model": "llama3.1",
            "message": { "role": "assistant", "content": "An incident is an unplanned interruption." },
            "done": true
        }))
        .unwrap();

        let message = from_wire(response).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "An incident is an unplanned interruption.");
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn test_parse_tool_calls() {
        let response: ChatResponse = serde_json::from_value(json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    { "function": { "name": "retrieve_context", "arguments": { "query": "incident" } } },
                    { "function": { "name": "retrieve_context", "arguments": "{\"query\":\"problem\"}" } }
                ]
            },
            "done": true
        }))
        .unwrap();

        let message = from_wire(response).unwrap();
        assert_eq!(message.tool_calls.len(), 2);
        assert_eq!(message.tool_calls[0].id, "");
        assert_eq!(message.tool_calls[0].arguments, json!({ "query": "incident" }));
        assert_eq!(message.tool_calls[1].arguments, json!({ "query": "problem" }));
    }

    #[test]
    fn test_missing_message_is_model_error() {
        let response: ChatResponse = serde_json::from_value(json!({ "done": true })).unwrap();
        assert!(matches!(from_wire(response), Err(Error::ModelUnavailable(_))));
    }

    #[test]
    fn test_tool_message_wire_format_drops_artifact() {
        let call = ToolCall {
            id: "call_0_0".to_string(),
            name: "retrieve_context".to_string(),
            arguments: json!({ "query": "incident" }),
        };
        let message = ChatMessage::tool_result(
            &call,
            "Source: doc1\n\nContent: A",
            Some(vec![RetrievedPassage::with_source("A", "doc1")]),
        );

        let wire = serde_json::to_value(to_wire(&message)).unwrap();
        assert_eq!(
            wire,
            json!({
                "role": "tool",
                "content": "Source: doc1\n\nContent: A",
                "tool_name": "retrieve_context"
            })
        );
    }
}
