mod common;

use std::sync::Arc;

use common::*;
use docs_assistant::types::ChatMessage;
use docs_assistant::{ChatSession, ConversationTurn, Error};

#[tokio::test]
async fn successful_turns_are_recorded() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(ChatMessage::assistant("An incident is an unplanned interruption.\n")),
        Ok(ChatMessage::assistant("You asked what an incident is.")),
    ]));
    let pipeline = Arc::new(pipeline(model.clone(), Arc::new(TableRetriever::new())));
    let mut session = ChatSession::new(pipeline, "ServiceNow");

    assert_eq!(
        session.greeting(),
        "Hi, ask me anything about ServiceNow documentation."
    );

    session.ask("What is an incident?").await.unwrap();
    session.ask("What did I just ask?").await.unwrap();

    assert_eq!(
        session.history()[..2],
        [
            ConversationTurn::user("What is an incident?"),
            ConversationTurn::assistant("An incident is an unplanned interruption."),
        ]
    );
    assert_eq!(session.history().len(), 4);

    // second call saw the first exchange replayed
    assert_eq!(model.seen.lock().unwrap()[1].len(), 4);
}

#[tokio::test]
async fn failed_turn_is_not_recorded() {
    let model = Arc::new(ScriptedModel::new(vec![Err(Error::model("down"))]));
    let pipeline = Arc::new(pipeline(model, Arc::new(TableRetriever::new())));
    let mut session = ChatSession::new(pipeline, "ServiceNow");

    assert!(session.ask("What is an incident?").await.is_err());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn questions_listed_newest_first_and_clear() {
    let model = Arc::new(ScriptedModel::always(ChatMessage::assistant("ok")));
    let pipeline = Arc::new(pipeline(model, Arc::new(TableRetriever::new())));
    let mut session = ChatSession::new(pipeline, "ServiceNow");

    session.ask("first").await.unwrap();
    session
        .ask("How do I configure assignment rules for the incident table?")
        .await
        .unwrap();

    assert_eq!(
        session.user_questions(),
        vec![
            "How do I configure assignment rules for ...".to_string(),
            "first".to_string(),
        ]
    );

    session.clear();
    assert!(session.user_questions().is_empty());
}
