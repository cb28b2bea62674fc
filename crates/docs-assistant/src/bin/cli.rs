//! Documentation assistant command-line interface

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

use docs_assistant::{
    config::AssistantConfig, logging::init_tracing, server::AssistantServer, wants_references,
    AnswerPipeline, AnswerResult, ChatSession,
};

/// Ask questions about product documentation
#[derive(Parser, Debug)]
#[command(name = "docs-assistant", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a single question
    Ask {
        /// The question
        query: String,
    },
    /// Interactive chat keeping conversation history
    Chat,
    /// Run the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AssistantConfig::load(args.config.as_deref())?;
    init_tracing(&config.logging)?;

    match args.command {
        Command::Ask { query } => {
            let pipeline = AnswerPipeline::from_config(&config)?;
            let spinner = spinner();
            let result = pipeline.answer(&query, None).await;
            spinner.finish_and_clear();

            let result = result?;
            println!("{}", result.answer.trim());
            print_sources(&result);
        }
        Command::Chat => {
            let pipeline = Arc::new(AnswerPipeline::from_config(&config)?);
            chat(ChatSession::new(pipeline, config.agent.product_name.clone())).await?;
        }
        Command::Serve => {
            AssistantServer::new(&config)?.start().await?;
        }
    }

    Ok(())
}

async fn chat(mut session: ChatSession) -> anyhow::Result<()> {
    println!("{}", style(session.greeting()).cyan().bold());
    println!(
        "{}",
        style("Commands: /history, /clear, /quit").dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n{} ", style(">").green().bold());
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{}", style("Conversation cleared.").dim());
                continue;
            }
            "/history" => {
                let questions = session.user_questions();
                if questions.is_empty() {
                    println!("{}", style("No questions yet.").dim());
                }
                for question in questions {
                    println!("  {}", question);
                }
                continue;
            }
            _ => {}
        }

        let spinner = spinner();
        let result = session.ask(query).await;
        spinner.finish_and_clear();

        match result {
            Ok(result) => {
                println!("\n{}", result.answer.trim());
                if wants_references(query) {
                    print_sources(&result);
                }
            }
            Err(e) => {
                println!("{}", style("Something went wrong.").red().bold());
                println!("{}", style(e).red());
            }
        }
    }

    Ok(())
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_sources(result: &AnswerResult) {
    let sources = result.unique_sources();

    println!("\n{}", style("References").bold());
    if sources.is_empty() {
        println!("  {}", style("No sources available.").dim());
    }
    for source in sources {
        println!("  - {}", source);
    }
}
