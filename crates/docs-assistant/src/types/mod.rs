//! Core types for the assistant

pub mod conversation;
pub mod message;
pub mod passage;
pub mod response;

pub use conversation::{ConversationHistory, ConversationTurn, TurnRole};
pub use message::{ChatMessage, MessageRole, ToolCall, ToolDefinition};
pub use passage::RetrievedPassage;
pub use response::AnswerResult;
