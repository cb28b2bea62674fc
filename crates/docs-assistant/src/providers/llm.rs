//! Chat model provider trait for tool-using generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatMessage, ToolDefinition};

/// Trait for a chat model that can call declared tools
///
/// Implementations:
/// - `OllamaChat`: Local Ollama server (`/api/chat`)
/// - `OpenAiChat`: OpenAI chat completions (`/chat/completions`)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the transcript and tool declarations, returning the assistant reply
    ///
    /// The reply either carries `tool_calls` or is a final text answer.
    /// Artifacts on tool messages must never be forwarded to the provider.
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
