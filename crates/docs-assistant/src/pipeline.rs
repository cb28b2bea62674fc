//! Pipeline entry point: one query (plus optional history) in, answer with sources out

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::agent::{prompt::system_prompt, AnsweringAgent};
use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use crate::providers::{self, ChatModel};
use crate::retrieval::{Retriever, VectorRetriever};
use crate::types::{AnswerResult, ChatMessage, ConversationTurn, MessageRole, RetrievedPassage};

/// Retrieval-augmented answering pipeline
///
/// Stateless between calls: conversation history is owned by the caller and
/// passed in on every query.
pub struct AnswerPipeline {
    agent: AnsweringAgent,
    run_timeout: Duration,
}

impl AnswerPipeline {
    /// Create a pipeline from an agent and a deadline for each run
    pub fn new(agent: AnsweringAgent, run_timeout: Duration) -> Self {
        Self { agent, run_timeout }
    }

    /// Build the providers selected by `config` and wire them together
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let embedder = providers::embedding_from_config(config)?;
        let index = providers::index_from_config(config)?;
        let model: Arc<dyn ChatModel> = providers::chat_model_from_config(config)?;

        tracing::info!(
            "Pipeline: embeddings={} index={} llm={} ({})",
            embedder.name(),
            index.name(),
            model.name(),
            model.model()
        );

        let retriever: Arc<dyn Retriever> = Arc::new(VectorRetriever::new(
            embedder,
            index,
            Duration::from_secs(config.agent.retrieval_timeout_secs),
        ));

        let agent = AnsweringAgent::new(
            model,
            retriever,
            system_prompt(&config.agent.product_name),
            config.agent.max_tool_rounds,
        );

        Ok(Self::new(
            agent,
            Duration::from_secs(config.agent.run_timeout_secs),
        ))
    }

    /// Answer `query`, replaying `history` first
    ///
    /// Failures of retrieval or the model reach the caller unchanged.
    pub async fn answer(
        &self,
        query: &str,
        history: Option<&[ConversationTurn]>,
    ) -> Result<AnswerResult> {
        let history_len = history.map_or(0, |h| h.len());
        let span = tracing::info_span!(
            "answer",
            query_len = query.len(),
            history_len,
            request_id = %uuid::Uuid::new_v4()
        );

        async move {
            let start = Instant::now();
            let messages = build_messages(query, history);

            let run = tokio::time::timeout(self.run_timeout, self.agent.run(messages))
                .await
                .map_err(|_| Error::timeout("answer", self.run_timeout.as_secs()))??;

            let result = AnswerResult {
                answer: run.answer().to_string(),
                source_documents: extract_source_documents(&run.messages),
            };

            tracing::info!(
                "Answered with {} source passages in {:?}",
                result.source_documents.len(),
                start.elapsed()
            );

            Ok(result)
        }
        .instrument(span)
        .await
    }
}

/// History turns in order, then the query as the final user message
pub fn build_messages(query: &str, history: Option<&[ConversationTurn]>) -> Vec<ChatMessage> {
    let history = history.unwrap_or_default();
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(query));
    messages
}

/// Every passage carried by tool results, in transcript order, without de-duplication
pub fn extract_source_documents(messages: &[ChatMessage]) -> Vec<RetrievedPassage> {
    messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .filter_map(|m| m.artifact.as_ref())
        .flat_map(|passages| passages.iter().cloned())
        .collect()
}
