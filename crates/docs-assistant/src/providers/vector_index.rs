//! Vector index provider trait for similarity search

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetrievedPassage;

/// Search result from the vector index
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched passage
    pub passage: RetrievedPassage,
    /// Similarity score as reported by the index (higher is more similar)
    pub similarity: f32,
}

/// Trait for read-only similarity search
///
/// Implementations:
/// - `MemoryIndex`: In-process index loaded from a JSON snapshot
/// - `PineconeIndex`: Pinecone serverless index
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Return up to `top_k` matches, most similar first
    async fn search(&self, query_embedding: &[f32], top_k: usize)
        -> Result<Vec<VectorSearchResult>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
