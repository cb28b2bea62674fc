//! The `retrieve_context` tool exposed to the model

use serde_json::json;
use std::sync::Arc;

use crate::error::Result;
use crate::retrieval::Retriever;
use crate::types::{RetrievedPassage, ToolDefinition};

/// Name the model uses to call the tool
pub const RETRIEVAL_TOOL_NAME: &str = "retrieve_context";

/// Number of passages fetched per invocation
pub const RETRIEVAL_K: usize = 4;

const DESCRIPTION: &str = "Retrieve relevant documentation to help answer user questions";

/// Dual-channel tool result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Text shown to the model
    pub content: String,
    /// Retrieved passages, kept for provenance and never shown to the model
    pub artifact: Vec<RetrievedPassage>,
}

/// Retrieval capability offered to the model
#[derive(Clone)]
pub struct RetrievalTool {
    retriever: Arc<dyn Retriever>,
}

impl RetrievalTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }

    /// Declaration sent to the model on every turn
    pub fn definition() -> ToolDefinition {
        ToolDefinition {
            name: RETRIEVAL_TOOL_NAME.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for the documentation"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    /// Extract the `query` argument, describing what is wrong otherwise
    pub fn parse_query(arguments: &serde_json::Value) -> std::result::Result<&str, String> {
        match arguments.get("query") {
            Some(serde_json::Value::String(query)) => Ok(query.as_str()),
            Some(other) => Err(format!("argument 'query' must be a string, got {}", other)),
            None => Err("missing required argument 'query'".to_string()),
        }
    }

    /// Fetch the top passages for `query`
    pub async fn invoke(&self, query: &str) -> Result<ToolOutput> {
        let passages: Vec<RetrievedPassage> = self
            .retriever
            .search(query, RETRIEVAL_K)
            .await?
            .into_iter()
            .map(|p| RetrievedPassage::new(p.text, p.metadata))
            .collect();

        Ok(ToolOutput {
            content: format_passages(&passages),
            artifact: passages,
        })
    }
}

/// Render passages as `Source: ...\n\nContent: ...` blocks separated by a blank line
pub fn format_passages(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|p| format!("Source: {}\n\nContent: {}", p.source(), p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingRetriever {
        passages: Vec<RetrievedPassage>,
        requests: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl Retriever for RecordingRetriever {
        async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
            self.requests.lock().unwrap().push((query.to_string(), k));
            Ok(self.passages.clone())
        }
    }

    #[test]
    fn test_format_passages() {
        let passages = vec![
            RetrievedPassage::with_source("A", "doc1"),
            RetrievedPassage::with_source("B", "doc2"),
        ];
        assert_eq!(
            format_passages(&passages),
            "Source: doc1\n\nContent: A\n\nSource: doc2\n\nContent: B"
        );
    }

    #[test]
    fn test_format_missing_source_and_empty() {
        let passages = vec![RetrievedPassage::new("A", Default::default())];
        assert_eq!(format_passages(&passages), "Source: Unknown\n\nContent: A");
        assert_eq!(format_passages(&[]), "");
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            RetrievalTool::parse_query(&json!({ "query": "incident" })),
            Ok("incident")
        );
        assert!(RetrievalTool::parse_query(&json!({ "query": 3 })).is_err());
        assert!(RetrievalTool::parse_query(&json!({})).is_err());
        assert!(RetrievalTool::parse_query(&json!("incident")).is_err());
    }

    #[test]
    fn test_definition_schema() {
        let definition = RetrievalTool::definition();
        assert_eq!(definition.name, "retrieve_context");
        assert_eq!(definition.parameters["required"], json!(["query"]));
        assert_eq!(definition.parameters["properties"]["query"]["type"], json!("string"));
    }

    #[tokio::test]
    async fn test_invoke_uses_fixed_width_and_keeps_artifact() {
        let retriever = Arc::new(RecordingRetriever {
            passages: vec![RetrievedPassage::with_source("A", "doc1")],
            requests: Mutex::new(Vec::new()),
        });
        let tool = RetrievalTool::new(retriever.clone());

        let output = tool.invoke("what is an incident").await.unwrap();
        assert_eq!(output.content, "Source: doc1\n\nContent: A");
        assert_eq!(output.artifact, vec![RetrievedPassage::with_source("A", "doc1")]);
        assert_eq!(
            *retriever.requests.lock().unwrap(),
            vec![("what is an incident".to_string(), 4)]
        );
    }

    #[tokio::test]
    async fn test_invoke_fills_missing_source() {
        let bare: RetrievedPassage =
            serde_json::from_value(json!({ "text": "A", "metadata": {} })).unwrap();
        let retriever = Arc::new(RecordingRetriever {
            passages: vec![bare],
            requests: Mutex::new(Vec::new()),
        });

        let output = RetrievalTool::new(retriever).invoke("incident").await.unwrap();
        assert_eq!(output.content, "Source: Unknown\n\nContent: A");
        assert_eq!(output.artifact[0].metadata.get("source"), Some(&json!("Unknown")));
    }
}
