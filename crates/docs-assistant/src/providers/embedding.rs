//! Embedding provider trait for query vectors

use async_trait::async_trait;

use crate::error::Result;

/// Trait for turning query text into an embedding vector
///
/// Implementations:
/// - `OllamaEmbedder`: Local Ollama server (nomic-embed-text)
/// - `OpenAiEmbedder`: OpenAI embeddings API (text-embedding-3-small)
///
/// Failures are reported as `Error::RetrievalUnavailable` (or `Error::Timeout`),
/// since no retrieval can happen without a query vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
