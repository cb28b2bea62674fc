//! Tool-using answering agent
//!
//! The agent alternates between the chat model and the retrieval tool until
//! the model replies without requesting a tool, or the round-trip budget
//! runs out.

pub mod prompt;
pub mod runner;
pub mod tool;

pub use runner::{AgentRun, AgentState, AgentStep, AnsweringAgent};
pub use tool::{format_passages, RetrievalTool, ToolOutput, RETRIEVAL_K, RETRIEVAL_TOOL_NAME};
