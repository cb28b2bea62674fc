//! Interactive chat session keeping its own conversation history

use std::sync::Arc;

use crate::error::Result;
use crate::pipeline::AnswerPipeline;
use crate::types::{AnswerResult, ConversationHistory, ConversationTurn, TurnRole};

/// Longest question preview shown by [`ChatSession::user_questions`]
const QUESTION_PREVIEW_CHARS: usize = 40;

/// One user's conversation with the assistant
pub struct ChatSession {
    pipeline: Arc<AnswerPipeline>,
    history: ConversationHistory,
    product_name: String,
}

impl ChatSession {
    pub fn new(pipeline: Arc<AnswerPipeline>, product_name: impl Into<String>) -> Self {
        Self {
            pipeline,
            history: ConversationHistory::new(),
            product_name: product_name.into(),
        }
    }

    /// Opening line shown before the first question
    pub fn greeting(&self) -> String {
        format!(
            "Hi, ask me anything about {} documentation.",
            self.product_name
        )
    }

    /// Ask a question in the context of the turns so far
    ///
    /// The question and the answer are recorded only when answering succeeds.
    pub async fn ask(&mut self, query: &str) -> Result<AnswerResult> {
        let result = self.pipeline.answer(query, Some(self.history.as_slice())).await?;

        self.history.push(ConversationTurn::user(query));
        self.history
            .push(ConversationTurn::assistant(result.answer.trim()));

        Ok(result)
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Previous questions, newest first, shortened for listing
    pub fn user_questions(&self) -> Vec<String> {
        self.history
            .iter()
            .rev()
            .filter(|turn| turn.role == TurnRole::User)
            .map(|turn| preview(&turn.content))
            .collect()
    }
}

fn preview(question: &str) -> String {
    if question.chars().count() > QUESTION_PREVIEW_CHARS {
        let short: String = question.chars().take(QUESTION_PREVIEW_CHARS).collect();
        format!("{}...", short)
    } else {
        question.to_string()
    }
}
