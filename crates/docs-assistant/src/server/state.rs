//! Application state for the HTTP server

use std::sync::Arc;

use crate::pipeline::AnswerPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: Arc<AnswerPipeline>,
    product_name: String,
}

impl AppState {
    pub fn new(pipeline: Arc<AnswerPipeline>, product_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pipeline,
                product_name: product_name.into(),
            }),
        }
    }

    /// Answering pipeline shared by all requests
    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.inner.pipeline
    }

    pub fn product_name(&self) -> &str {
        &self.inner.product_name
    }
}
