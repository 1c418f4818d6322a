//! agentica - command line entry point
//!
//! Runs the web research agent once with the instruction given on the command
//! line.

use agentica::agent::{Agent, AgentOptions, WEB_RESEARCH_SYSTEM_PROMPT};
use agentica::config::Config;
use agentica::environment::SearchEnvironment;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_INSTRUCTION: &str = "Can you find me events in Austin today?";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentica=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: provider={} model={}",
        config.model.provider, config.model.model
    );

    let environment = SearchEnvironment::new(None)?;
    let mut agent = Agent::new(WEB_RESEARCH_SYSTEM_PROMPT, config.model.clone(), environment)
        .with_options(AgentOptions::from(&config));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let instruction = if args.is_empty() {
        DEFAULT_INSTRUCTION.to_string()
    } else {
        args.join(" ")
    };

    let outcome = agent.run(&instruction).await?;

    println!("Task Outcome: {}", outcome.status);
    println!("Message: {}", outcome.message.unwrap_or_default());

    Ok(())
}
