//! HTTP server exposing the answering pipeline

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AssistantConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::pipeline::AnswerPipeline;
use state::AppState;

/// Documentation assistant HTTP server
pub struct AssistantServer {
    config: ServerConfig,
    state: AppState,
}

impl AssistantServer {
    /// Build the pipeline from `config` and wrap it in a server
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let pipeline = Arc::new(AnswerPipeline::from_config(config)?);
        Ok(Self::with_pipeline(
            config.server.clone(),
            pipeline,
            config.agent.product_name.clone(),
        ))
    }

    /// Serve an already constructed pipeline
    pub fn with_pipeline(
        config: ServerConfig,
        pipeline: Arc<AnswerPipeline>,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            state: AppState::new(pipeline, product_name),
        }
    }

    /// Router with all routes and middleware
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.config.enable_cors)
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting documentation assistant on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::config(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Assemble routes and middleware around `state`
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
