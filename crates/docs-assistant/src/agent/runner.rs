//! Answering agent loop

use futures_util::future::try_join_all;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::ChatModel;
use crate::retrieval::Retriever;
use crate::types::{ChatMessage, MessageRole, ToolCall, ToolDefinition};

use super::tool::{RetrievalTool, RETRIEVAL_TOOL_NAME};

/// Where the loop currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Waiting for the model's next reply
    AwaitingModel,
    /// Executing the tool calls the model asked for
    AwaitingToolResult,
    /// The model produced its final answer
    Done,
}

/// What the model asked for in one reply
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    /// No tool requests; the text is the answer
    FinalAnswer(String),
    /// One or more tool invocations, in request order
    ToolRequest(Vec<ToolCall>),
}

impl AgentStep {
    /// Classify an assistant reply
    pub fn from_reply(reply: &ChatMessage) -> Self {
        if reply.has_tool_calls() {
            AgentStep::ToolRequest(reply.tool_calls.clone())
        } else {
            AgentStep::FinalAnswer(reply.content.clone())
        }
    }
}

/// Transcript of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRun {
    /// System instruction, seed messages, then every assistant and tool message
    pub messages: Vec<ChatMessage>,
}

impl AgentRun {
    /// Content of the final assistant message
    pub fn answer(&self) -> &str {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Agent that answers with the help of the retrieval tool
pub struct AnsweringAgent {
    model: Arc<dyn ChatModel>,
    tool: RetrievalTool,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl AnsweringAgent {
    /// Create an agent; `max_tool_rounds` bounds model/tool round trips
    pub fn new(
        model: Arc<dyn ChatModel>,
        retriever: Arc<dyn Retriever>,
        system_prompt: impl Into<String>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            model,
            tool: RetrievalTool::new(retriever),
            system_prompt: system_prompt.into(),
            max_tool_rounds,
        }
    }

    /// Run the loop over `messages` (history plus the current question)
    pub async fn run(&self, messages: Vec<ChatMessage>) -> Result<AgentRun> {
        let tools = [RetrievalTool::definition()];

        let mut transcript = Vec::with_capacity(messages.len() + 1);
        transcript.push(ChatMessage::system(self.system_prompt.as_str()));
        transcript.extend(messages);

        let mut state = AgentState::AwaitingModel;
        let mut pending: Vec<ToolCall> = Vec::new();
        let mut rounds = 0;

        loop {
            match state {
                AgentState::AwaitingModel => {
                    let reply = self.model.chat(&transcript, &tools).await?;

                    match AgentStep::from_reply(&reply) {
                        AgentStep::FinalAnswer(answer) => {
                            transcript.push(ChatMessage::assistant(answer));
                            state = self.transition(state, AgentState::Done);
                        }
                        AgentStep::ToolRequest(_) if rounds >= self.max_tool_rounds => {
                            tracing::warn!(
                                "Model still requesting tools after {} round trips",
                                rounds
                            );
                            return Err(Error::AgentStalled { rounds });
                        }
                        AgentStep::ToolRequest(calls) => {
                            pending = assign_call_ids(calls, rounds);
                            transcript.push(ChatMessage::assistant_tool_calls(
                                reply.content,
                                pending.clone(),
                            ));
                            state = self.transition(state, AgentState::AwaitingToolResult);
                        }
                    }
                }
                AgentState::AwaitingToolResult => {
                    let calls = std::mem::take(&mut pending);
                    tracing::debug!("Round {}: executing {} tool calls", rounds + 1, calls.len());

                    let results = try_join_all(calls.iter().map(|call| self.execute(call))).await?;
                    transcript.extend(results);
                    rounds += 1;
                    state = self.transition(state, AgentState::AwaitingModel);
                }
                AgentState::Done => break,
            }
        }

        Ok(AgentRun {
            messages: transcript,
        })
    }

    fn transition(&self, from: AgentState, to: AgentState) -> AgentState {
        tracing::debug!("Agent state {:?} -> {:?}", from, to);
        to
    }

    /// Answer one tool call
    ///
    /// Model mistakes (unknown tool, bad arguments) are reported back to the
    /// model as an error result. Retrieval failures abort the run.
    async fn execute(&self, call: &ToolCall) -> Result<ChatMessage> {
        if call.name != RETRIEVAL_TOOL_NAME {
            tracing::warn!("Model requested unknown tool '{}'", call.name);
            return Ok(ChatMessage::tool_result(
                call,
                format!(
                    "Error: {} is not a valid tool, try one of [{}].",
                    call.name, RETRIEVAL_TOOL_NAME
                ),
                None,
            ));
        }

        let query = match RetrievalTool::parse_query(&call.arguments) {
            Ok(query) => query,
            Err(problem) => {
                tracing::warn!("Invalid arguments for {}: {}", call.name, problem);
                return Ok(ChatMessage::tool_result(call, format!("Error: {}", problem), None));
            }
        };

        let output = self.tool.invoke(query).await?;
        Ok(ChatMessage::tool_result(call, output.content, Some(output.artifact)))
    }
}

/// Give every call an id, keeping provider-assigned ones
fn assign_call_ids(calls: Vec<ToolCall>, round: usize) -> Vec<ToolCall> {
    calls
        .into_iter()
        .enumerate()
        .map(|(index, mut call)| {
            if call.id.is_empty() {
                call.id = format!("call_{}_{}", round, index);
            }
            call
        })
        .collect()
}
