//! Answer returned by the pipeline

use serde::{Deserialize, Serialize};

use super::passage::RetrievedPassage;

/// Words in a query that signal interest in the sources behind an answer
pub const REFERENCE_KEYWORDS: &[&str] = &["source", "reference", "link", "url"];

/// Result of answering one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Final assistant answer
    pub answer: String,
    /// Every passage retrieved during this query, in retrieval order (not de-duplicated)
    pub source_documents: Vec<RetrievedPassage>,
}

impl AnswerResult {
    /// Unique source identifiers in first-seen order
    pub fn unique_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for passage in &self.source_documents {
            let source = passage.source();
            if !sources.iter().any(|s| s == source) {
                sources.push(source.to_string());
            }
        }
        sources
    }
}

/// Whether a query asks for sources, so a "References" section is worth showing
pub fn wants_references(query: &str) -> bool {
    let lower = query.to_lowercase();
    REFERENCE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
