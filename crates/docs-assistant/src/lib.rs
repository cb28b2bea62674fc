//! docs-assistant: documentation Q&A over a vector index with source provenance
//!
//! A tool-using chat model answers questions about a product's documentation.
//! The model decides when to call the `retrieve_context` tool; every passage the
//! tool returns is kept as an artifact and surfaced alongside the answer so
//! callers can show where it came from.
//!
//! ```no_run
//! # async fn demo() -> docs_assistant::Result<()> {
//! use docs_assistant::{AnswerPipeline, AssistantConfig};
//!
//! let config = AssistantConfig::load(None)?;
//! let pipeline = AnswerPipeline::from_config(&config)?;
//! let result = pipeline.answer("How do I close an incident?", None).await?;
//! println!("{}", result.answer);
//! for source in result.unique_sources() {
//!     println!("- {}", source);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::AssistantConfig;
pub use error::{Error, Result};
pub use pipeline::AnswerPipeline;
pub use session::ChatSession;
pub use types::{
    conversation::{ConversationHistory, ConversationTurn, TurnRole},
    passage::RetrievedPassage,
    response::{wants_references, AnswerResult},
};
