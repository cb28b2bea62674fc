//! Documentation assistant HTTP server
//!
//! Run with: cargo run -p docs-assistant --bin docs-assistant-server [config.toml]

use std::path::PathBuf;

use docs_assistant::{config::AssistantConfig, logging::init_tracing, server::AssistantServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);

    // Logging settings come from the config file, so it is loaded first
    let config = AssistantConfig::load(explicit.as_deref())?;
    init_tracing(&config.logging)?;

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  Documentation Assistant                  ║
║            Answers with retrieved source passages         ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    tracing::info!("Configuration loaded");
    tracing::info!("  - Product: {}", config.agent.product_name);
    tracing::info!("  - Embeddings: {:?} ({})", config.embeddings.provider, config.embeddings.model);
    tracing::info!("  - Index: {:?}", config.index.provider);
    tracing::info!("  - LLM: {:?} ({})", config.llm.provider, config.llm.model);
    tracing::info!("  - Max tool rounds: {}", config.agent.max_tool_rounds);

    let server = AssistantServer::new(&config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  Info: http://{}/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask    - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
