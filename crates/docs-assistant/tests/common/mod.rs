//! Scripted stand-ins for the chat model and retriever

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use docs_assistant::agent::{prompt::system_prompt, AnsweringAgent, RETRIEVAL_TOOL_NAME};
use docs_assistant::providers::ChatModel;
use docs_assistant::retrieval::Retriever;
use docs_assistant::types::{ChatMessage, ToolCall, ToolDefinition};
use docs_assistant::{AnswerPipeline, Error, Result, RetrievedPassage};

/// Chat model replaying a fixed list of replies and recording every transcript it saw
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ChatMessage>>>,
    repeat: Option<ChatMessage>,
    delay: Option<Duration>,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<ChatMessage>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Model that answers every turn with `reply`
    pub fn always(reply: ChatMessage) -> Self {
        Self {
            repeat: Some(reply),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, messages: &[ChatMessage], _tools: &[ToolDefinition]) -> Result<ChatMessage> {
        self.seen.lock().unwrap().push(messages.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reply) = &self.repeat {
            return Ok(reply.clone());
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::model("script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Retriever answering each query from a fixed table
#[derive(Default)]
pub struct TableRetriever {
    table: HashMap<String, Vec<RetrievedPassage>>,
    delays: HashMap<String, Duration>,
    fail: bool,
    pub requests: Mutex<Vec<(String, usize)>>,
}

impl TableRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, query: &str, passages: Vec<RetrievedPassage>) -> Self {
        self.table.insert(query.to_string(), passages);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }
}

#[async_trait]
impl Retriever for TableRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        self.requests.lock().unwrap().push((query.to_string(), k));

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(Error::retrieval("index unreachable"));
        }

        Ok(self.table.get(query).cloned().unwrap_or_default())
    }
}

pub fn passage(text: &str, source: &str) -> RetrievedPassage {
    RetrievedPassage::with_source(text, source)
}

pub fn retrieve_call(query: &str) -> ToolCall {
    ToolCall {
        id: String::new(),
        name: RETRIEVAL_TOOL_NAME.to_string(),
        arguments: json!({ "query": query }),
    }
}

pub fn tool_request(queries: &[&str]) -> ChatMessage {
    ChatMessage::assistant_tool_calls("", queries.iter().map(|q| retrieve_call(q)).collect())
}

pub fn pipeline(model: Arc<ScriptedModel>, retriever: Arc<TableRetriever>) -> AnswerPipeline {
    pipeline_with(model, retriever, 6, Duration::from_secs(30))
}

pub fn pipeline_with(
    model: Arc<ScriptedModel>,
    retriever: Arc<TableRetriever>,
    max_tool_rounds: usize,
    run_timeout: Duration,
) -> AnswerPipeline {
    let agent = AnsweringAgent::new(
        model,
        retriever,
        system_prompt("ServiceNow"),
        max_tool_rounds,
    );
    AnswerPipeline::new(agent, run_timeout)
}
