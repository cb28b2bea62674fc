//! Configuration for the documentation assistant

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "docs-assistant.toml";

/// Main assistant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Query embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Vector index configuration
    pub index: IndexConfig,
    /// Chat model configuration
    pub llm: LlmConfig,
    /// Agent loop configuration
    pub agent: AgentConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Embedding backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI embeddings API
    OpenAi,
}

impl EmbeddingBackend {
    /// Model used when the configuration names none for this backend
    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingBackend::Ollama => "nomic-embed-text",
            EmbeddingBackend::OpenAi => "text-embedding-3-small",
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend to use
    pub provider: EmbeddingBackend,
    /// Model name; must match the model the index was built with
    pub model: String,
    /// Base URL (backend default when unset)
    pub base_url: Option<String>,
    /// API key (OpenAI)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::Ollama,
            model: EmbeddingBackend::Ollama.default_model().to_string(),
            base_url: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// In-process index loaded from a JSON snapshot
    #[default]
    Memory,
    /// Pinecone serverless index
    Pinecone,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Backend to use
    pub provider: IndexBackend,
    /// Snapshot file for the memory backend
    pub snapshot_path: Option<PathBuf>,
    /// Index host URL (Pinecone), e.g. `https://docs-abc123.svc.us-east-1.pinecone.io`
    pub host: Option<String>,
    /// API key (Pinecone)
    pub api_key: Option<String>,
    /// Namespace within the index
    pub namespace: Option<String>,
    /// Metadata key holding passage text
    pub text_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            provider: IndexBackend::Memory,
            snapshot_path: None,
            host: None,
            api_key: None,
            namespace: None,
            text_key: "text".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat model backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI chat completions API (or any compatible server)
    OpenAi,
}

impl LlmBackend {
    /// Model used when the configuration names none for this backend
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Ollama => "llama3.1",
            LlmBackend::OpenAi => "gpt-4o-mini",
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend to use
    pub provider: LlmBackend,
    /// Model name; must support tool calling
    pub model: String,
    /// Base URL (backend default when unset)
    pub base_url: Option<String>,
    /// API key (OpenAI)
    pub api_key: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::Ollama,
            model: LlmBackend::Ollama.default_model().to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Product named in the system instruction
    pub product_name: String,
    /// Maximum model/tool round trips before giving up
    pub max_tool_rounds: usize,
    /// Deadline for one retrieval (embed + search) in seconds
    pub retrieval_timeout_secs: u64,
    /// Deadline for a whole answer run in seconds
    pub run_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            product_name: "ServiceNow".to_string(),
            max_tool_rounds: 6,
            retrieval_timeout_secs: 30,
            run_timeout_secs: 180,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "docs_assistant=info,tower_http=debug".to_string(),
            json: false,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve, load, apply environment overrides and validate
    ///
    /// Lookup order: `explicit`, `$DOCS_ASSISTANT_CONFIG`, `./docs-assistant.toml`,
    /// `<config dir>/docs-assistant/config.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(explicit) {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        config.apply_backend_defaults();
        config.validate()?;
        Ok(config)
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("DOCS_ASSISTANT_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("docs-assistant").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Override secrets and endpoints from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override secrets and endpoints using `lookup` as the environment
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            if self.embeddings.provider == EmbeddingBackend::OpenAi {
                self.embeddings.api_key = Some(key.clone());
            }
            if self.llm.provider == LlmBackend::OpenAi {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(key) = lookup("PINECONE_API_KEY") {
            self.index.api_key = Some(key);
        }
        if let Some(host) = lookup("PINECONE_INDEX_HOST") {
            self.index.host = Some(host);
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            if self.embeddings.provider == EmbeddingBackend::Ollama {
                self.embeddings.base_url = Some(url.clone());
            }
            if self.llm.provider == LlmBackend::Ollama {
                self.llm.base_url = Some(url);
            }
        }
    }

    /// Swap in the selected backend's default model when the file only changed the backend
    pub fn apply_backend_defaults(&mut self) {
        let ollama_embedding = EmbeddingBackend::Ollama.default_model();
        if self.embeddings.model.is_empty() || self.embeddings.model == ollama_embedding {
            self.embeddings.model = self.embeddings.provider.default_model().to_string();
        }

        let ollama_llm = LlmBackend::Ollama.default_model();
        if self.llm.model.is_empty() || self.llm.model == ollama_llm {
            self.llm.model = self.llm.provider.default_model().to_string();
        }
    }

    /// Check that the selected backends have what they need
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_tool_rounds == 0 {
            return Err(Error::config("agent.max_tool_rounds must be at least 1"));
        }

        if self.embeddings.provider == EmbeddingBackend::OpenAi && self.embeddings.api_key.is_none() {
            return Err(Error::config(
                "embeddings.api_key (or OPENAI_API_KEY) is required for the openai backend",
            ));
        }

        if self.llm.provider == LlmBackend::OpenAi && self.llm.api_key.is_none() {
            return Err(Error::config(
                "llm.api_key (or OPENAI_API_KEY) is required for the openai backend",
            ));
        }

        match self.index.provider {
            IndexBackend::Memory if self.index.snapshot_path.is_none() => Err(Error::config(
                "index.snapshot_path is required for the memory backend",
            )),
            IndexBackend::Pinecone if self.index.host.is_none() => Err(Error::config(
                "index.host (or PINECONE_INDEX_HOST) is required for the pinecone backend",
            )),
            IndexBackend::Pinecone if self.index.api_key.is_none() => Err(Error::config(
                "index.api_key (or PINECONE_API_KEY) is required for the pinecone backend",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AssistantConfig::from_toml(
            r#"
            [llm]
            model = "qwen2.5"

            [index]
            snapshot_path = "index.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "qwen2.5");
        assert_eq!(config.llm.provider, LlmBackend::Ollama);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.agent.max_tool_rounds, 6);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.index.text_key, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_names() {
        let config = AssistantConfig::from_toml(
            r#"
            [embeddings]
            provider = "openai"
            model = "text-embedding-3-small"

            [index]
            provider = "pinecone"

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.embeddings.provider, EmbeddingBackend::OpenAi);
        assert_eq!(config.index.provider, IndexBackend::Pinecone);
        assert_eq!(config.llm.provider, LlmBackend::OpenAi);
    }

    #[test]
    fn test_env_overrides_and_validation() {
        let mut config = AssistantConfig::from_toml(
            r#"
            [embeddings]
            provider = "openai"
            model = "text-embedding-3-small"

            [index]
            provider = "pinecone"

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("PINECONE_API_KEY", "pc-test"),
            ("PINECONE_INDEX_HOST", "https://docs.svc.pinecone.io"),
        ]);
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.embeddings.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.index.host.as_deref(), Some("https://docs.svc.pinecone.io"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_default_models() {
        let mut config = AssistantConfig::from_toml(
            r#"
            [embeddings]
            provider = "openai"

            [llm]
            provider = "openai"
            "#,
        )
        .unwrap();
        config.apply_backend_defaults();

        assert_eq!(config.embeddings.model, "text-embedding-3-small");
        assert_eq!(config.llm.model, "gpt-4o-mini");

        let mut config = AssistantConfig::default();
        config.apply_backend_defaults();
        assert_eq!(config.embeddings.model, "nomic-embed-text");
        assert_eq!(config.llm.model, "llama3.1");
    }

    #[test]
    fn test_example_file_is_valid() {
        let config =
            AssistantConfig::from_toml(include_str!("../docs-assistant.example.toml")).unwrap();
        assert_eq!(config.index.snapshot_path, Some(PathBuf::from("data/index.json")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut config = AssistantConfig::default();
        config.index.snapshot_path = Some(PathBuf::from("index.json"));
        config.agent.max_tool_rounds = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs-assistant.toml");
        std::fs::write(&path, "[agent]\nproduct_name = \"Acme\"\n").unwrap();

        let config = AssistantConfig::from_file(&path).unwrap();
        assert_eq!(config.agent.product_name, "Acme");
    }
}
