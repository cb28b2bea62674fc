//! In-process vector index loaded from a JSON snapshot
//!
//! The snapshot is a JSON array of records:
//!
//! ```json
//! [{ "id": "incident-1", "text": "...", "metadata": { "source": "..." }, "embedding": [0.1, ...] }]
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::RetrievedPassage;

use super::vector_index::{VectorIndexProvider, VectorSearchResult};

/// One stored passage with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub embedding: Vec<f32>,
}

/// Brute-force cosine similarity index
pub struct MemoryIndex {
    records: Vec<IndexRecord>,
    dimensions: usize,
}

impl MemoryIndex {
    /// Load a snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let records: Vec<IndexRecord> = serde_json::from_str(&content)?;
        let index = Self::from_records(records)?;

        tracing::info!(
            "Loaded {} passages ({} dimensions) from {}",
            index.len(),
            index.dimensions,
            path.display()
        );

        Ok(index)
    }

    /// Build an index from records; all embeddings must share one dimension
    pub fn from_records(records: Vec<IndexRecord>) -> Result<Self> {
        let dimensions = records.first().map(|r| r.embedding.len()).unwrap_or(0);

        if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimensions) {
            return Err(Error::config(format!(
                "Index record '{}' has {} dimensions, expected {}",
                bad.id,
                bad.embedding.len(),
                dimensions
            )));
        }

        Ok(Self { records, dimensions })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl VectorIndexProvider for MemoryIndex {
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        if !self.records.is_empty() && query_embedding.len() != self.dimensions {
            return Err(Error::retrieval(format!(
                "Query embedding has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (i, cosine_similarity(query_embedding, &record.embedding)))
            .collect();

        // Stable sort keeps snapshot order among equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, similarity)| {
                let record = &self.records[i];
                VectorSearchResult {
                    passage: RetrievedPassage::new(record.text.clone(), record.metadata.clone()),
                    similarity,
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
