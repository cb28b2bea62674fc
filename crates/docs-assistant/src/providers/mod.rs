//! Provider abstractions for embeddings, vector search and chat models
//!
//! Trait-based seams so the pipeline can run against local (Ollama, snapshot
//! index) or hosted (OpenAI, Pinecone) backends, or test stubs.

pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod openai;
pub mod pinecone;
pub mod vector_index;

mod http;

pub use embedding::EmbeddingProvider;
pub use llm::ChatModel;
pub use vector_index::{VectorIndexProvider, VectorSearchResult};

use std::sync::Arc;

use crate::config::{AssistantConfig, EmbeddingBackend, IndexBackend, LlmBackend};
use crate::error::{Error, Result};

/// Build the embedding provider selected by `config`
pub fn embedding_from_config(config: &AssistantConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match config.embeddings.provider {
        EmbeddingBackend::Ollama => Arc::new(ollama::OllamaEmbedder::new(&config.embeddings)?),
        EmbeddingBackend::OpenAi => Arc::new(openai::OpenAiEmbedder::new(&config.embeddings)?),
    })
}

/// Build the vector index selected by `config`
pub fn index_from_config(config: &AssistantConfig) -> Result<Arc<dyn VectorIndexProvider>> {
    Ok(match config.index.provider {
        IndexBackend::Memory => {
            let path = config
                .index
                .snapshot_path
                .as_ref()
                .ok_or_else(|| Error::config("index.snapshot_path is not set"))?;
            Arc::new(memory::MemoryIndex::load(path)?)
        }
        IndexBackend::Pinecone => Arc::new(pinecone::PineconeIndex::new(&config.index)?),
    })
}

/// Build the chat model selected by `config`
pub fn chat_model_from_config(config: &AssistantConfig) -> Result<Arc<dyn ChatModel>> {
    Ok(match config.llm.provider {
        LlmBackend::Ollama => Arc::new(ollama::OllamaChat::new(&config.llm)?),
        LlmBackend::OpenAi => Arc::new(openai::OpenAiChat::new(&config.llm)?),
    })
}
