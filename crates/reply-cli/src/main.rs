mod cli;
mod logging;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use reply_core::JsonFileConfigStore;
use reply_engine::{InboundMessage, RequestDispatcher};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    let store = match &cli.config {
        Some(path) => JsonFileConfigStore::new(path),
        None => JsonFileConfigStore::default_location(),
    };
    log::debug!("Using settings file {}", store.path().display());

    let message = match cli.command.to_message()? {
        Some(message) => message,
        None => read_stdin_message()?,
    };

    let dispatcher = RequestDispatcher::new(Arc::new(store));
    let envelope = dispatcher
        .submit(message)
        .await
        .into_envelope()
        .context("Result was superseded by a newer request")?;

    let output = if cli.compact {
        serde_json::to_string(&envelope)?
    } else {
        serde_json::to_string_pretty(&envelope)?
    };
    println!("{output}");

    if !envelope.ok {
        std::process::exit(1);
    }
    Ok(())
}

fn read_stdin_message() -> anyhow::Result<InboundMessage> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read stdin")?;
    serde_json::from_str(&raw).context("stdin does not hold a valid host message")
}
