//! Pinecone serverless index provider (query-only)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::types::RetrievedPassage;

use super::http::{build_client, join_url, post_json};
use super::vector_index::{VectorIndexProvider, VectorSearchResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

/// Pinecone index reached through its data-plane host
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
    text_key: String,
    timeout_secs: u64,
}

impl PineconeIndex {
    /// Create a new Pinecone index client
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let host = config
            .host
            .clone()
            .ok_or_else(|| Error::config("Pinecone index host is not set"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("Pinecone API key is not set"))?;

        // Hosts are shown without a scheme in the Pinecone console
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{}", host)
        };

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            host,
            api_key,
            namespace: config.namespace.clone(),
            text_key: config.text_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

/// Turn query matches into passages, moving the text out of the metadata
fn into_results(response: QueryResponse, text_key: &str) -> Result<Vec<VectorSearchResult>> {
    response
        .matches
        .into_iter()
        .map(|mut m| {
            let text = match m.metadata.remove(text_key) {
                Some(serde_json::Value::String(text)) => text,
                _ => {
                    return Err(Error::retrieval(format!(
                        "Pinecone match '{}' has no '{}' metadata",
                        m.id, text_key
                    )))
                }
            };
            Ok(VectorSearchResult {
                passage: RetrievedPassage::new(text, m.metadata),
                similarity: m.score,
            })
        })
        .collect()
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        let url = join_url(&self.host, "query");
        let request = QueryRequest {
            vector: query_embedding,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };

        let response: QueryResponse = post_json(
            self.client.post(&url).header("Api-Key", &self.api_key),
            &request,
        )
        .await
        .map_err(|f| f.into_error("Pinecone query", self.timeout_secs, Error::retrieval))?;

        tracing::debug!("Pinecone returned {} matches", response.matches.len());

        into_results(response, &self.text_key)
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_shape() {
        let vector = [0.1f32, 0.2];
        let request = QueryRequest {
            vector: &vector,
            top_k: 4,
            include_metadata: true,
            namespace: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["topK"], json!(4));
        assert_eq!(value["includeMetadata"], json!(true));
        assert!(value.get("namespace").is_none());
    }

    #[test]
    fn test_matches_become_passages_in_order() {
        let response: QueryResponse = serde_json::from_value(json!({
            "matches": [
                { "id": "a", "score": 0.91, "metadata": { "text": "Incident states", "source": "incident.html" } },
                { "id": "b", "score": 0.75, "metadata": { "text": "Problem records" } }
            ],
            "namespace": ""
        }))
        .unwrap();

        let results = into_results(response, "text").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].passage.text, "Incident states");
        assert_eq!(results[0].passage.source(), "incident.html");
        assert!(!results[0].passage.metadata.contains_key("text"));
        assert_eq!(results[1].passage.source(), "Unknown");
    }

    #[test]
    fn test_missing_text_is_retrieval_error() {
        let response: QueryResponse = serde_json::from_value(json!({
            "matches": [{ "id": "a", "score": 0.5, "metadata": { "source": "x" } }]
        }))
        .unwrap();

        assert!(matches!(
            into_results(response, "text"),
            Err(Error::RetrievalUnavailable(_))
        ));
    }

    #[test]
    fn test_host_scheme_is_added() {
        let config = IndexConfig {
            host: Some("docs-abc.svc.pinecone.io".to_string()),
            api_key: Some("key".to_string()),
            ..IndexConfig::default()
        };
        let index = PineconeIndex::new(&config).unwrap();
        assert_eq!(index.host, "https://docs-abc.svc.pinecone.io");
    }
}
