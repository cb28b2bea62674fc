//! Retrieved passage with source tracking for citations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key holding the passage's source identifier
pub const SOURCE_KEY: &str = "source";

/// Source recorded when the index carries none
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A passage returned by the similarity index
///
/// `metadata` always holds a non-empty string under `"source"`; the
/// constructor fills in `"Unknown"` when the index did not provide one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text
    pub text: String,
    /// Index metadata (ordered for stable serialization)
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl RetrievedPassage {
    /// Create a passage, normalizing the source entry
    pub fn new(text: impl Into<String>, mut metadata: BTreeMap<String, serde_json::Value>) -> Self {
        let has_source = metadata
            .get(SOURCE_KEY)
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty());

        if !has_source {
            metadata.insert(
                SOURCE_KEY.to_string(),
                serde_json::Value::String(UNKNOWN_SOURCE.to_string()),
            );
        }

        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Create a passage with only a source entry
    pub fn with_source(text: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            SOURCE_KEY.to_string(),
            serde_json::Value::String(source.into()),
        );
        Self::new(text, metadata)
    }

    /// Source identifier of this passage
    pub fn source(&self) -> &str {
        self.metadata
            .get(SOURCE_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_source_becomes_unknown() {
        let passage = RetrievedPassage::new("text", BTreeMap::new());
        assert_eq!(passage.source(), "Unknown");
        assert_eq!(passage.metadata.get("source"), Some(&json!("Unknown")));
    }

    #[test]
    fn test_non_string_or_empty_source_becomes_unknown() {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!(42));
        assert_eq!(RetrievedPassage::new("a", metadata).source(), "Unknown");

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!(""));
        assert_eq!(RetrievedPassage::new("a", metadata).source(), "Unknown");
    }

    #[test]
    fn test_whitespace_source_is_kept() {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!("  "));
        assert_eq!(RetrievedPassage::new("a", metadata).source(), "  ");
    }

    #[test]
    fn test_existing_metadata_is_kept() {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!("docs/incident.html"));
        metadata.insert("page".to_string(), json!(3));
        let passage = RetrievedPassage::new("Incident management", metadata);

        assert_eq!(passage.source(), "docs/incident.html");
        assert_eq!(passage.metadata.get("page"), Some(&json!(3)));
    }
}
