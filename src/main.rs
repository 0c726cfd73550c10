use std::io::Read;

use anyhow::{Context, bail};
use clap::Parser;

use agent_relay::cli::Cli;
use agent_relay::clipboard::ClipboardWriter;
use agent_relay::config::Config;
use agent_relay::{RequestGate, to_html};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    let gate = RequestGate::new(&config)?;

    // Held for the rest of main so a system clipboard handle outlives the copy.
    let mut clipboard = cli.copy.then(ClipboardWriter::new);

    let prompt = match cli.prompt_text() {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read prompt from stdin")?;
            buf
        }
    };
    let agent = cli.agent.unwrap_or_else(|| config.agent.clone());

    let result = gate.submit(&prompt, &agent).await;
    if result.is_error() {
        bail!("{}", result.error);
    }

    println!("{}", to_html(result.response.as_str()));

    if clipboard
        .as_mut()
        .is_some_and(|c| !c.copy(&result.response))
    {
        tracing::warn!("could not copy response to clipboard");
    }
    Ok(())
}
