//! Query text to ordered passages: embed, then search the vector index

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorIndexProvider};
use crate::types::RetrievedPassage;

/// Read-only similarity search over the documentation corpus
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` passages, most similar first
    ///
    /// Ties keep the index's native order. Failures of the underlying index
    /// or embedding provider surface as `Error::RetrievalUnavailable`.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>>;
}

/// Retriever backed by an embedding provider and a vector index
pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    timeout: Duration,
}

impl VectorRetriever {
    /// Create a new retriever; `timeout` bounds embed + search together
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            index,
            timeout,
        }
    }

    async fn embed_and_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        let embedding = self.embedder.embed(query).await?;
        let results = self.index.search(&embedding, k).await?;

        Ok(results
            .into_iter()
            .take(k)
            .map(|result| result.passage)
            .collect())
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        if k == 0 {
            return Err(Error::invalid_request("retrieval width k must be at least 1"));
        }

        let start = Instant::now();
        let passages = tokio::time::timeout(self.timeout, self.embed_and_search(query, k))
            .await
            .map_err(|_| Error::timeout("retrieval", self.timeout.as_secs()))??;

        if passages.is_empty() {
            tracing::warn!("No passages found for query ({} chars)", query.len());
        }

        tracing::debug!(
            "Retrieved {} passages via {}/{} in {:?}",
            passages.len(),
            self.embedder.name(),
            self.index.name(),
            start.elapsed()
        );

        Ok(passages)
    }
}
