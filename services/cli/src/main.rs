//! services/cli/src/main.rs
//!
//! Entry point for the terminal front end: parses arguments, wires the
//! HTTP history adapter, and either runs the interactive wizard or one of
//! the non-interactive history subcommands.

mod http;
mod ui;

use std::io;

use clap::{Parser, Subcommand};
use fuelsplit_core::ports::HistoryStore;
use http::HttpHistoryStore;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Parser)]
#[command(name = "fuelsplit", version)]
#[command(about = "Carpool fuel-cost splitting calculator")]
struct Args {
    /// Base URL of the history service. Falls back to the
    /// FUELSPLIT_API_URL environment variable.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the saved history and exit
    History,
    /// Delete the entire saved history and exit
    Clear,
}

fn resolve_api_url(args: &Args) -> String {
    args.api_url
        .clone()
        .or_else(|| std::env::var("FUELSPLIT_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let store = HttpHistoryStore::new(&resolve_api_url(&args));

    match args.command {
        Some(Command::History) => ui::print_history(&store).await?,
        Some(Command::Clear) => {
            store.clear_all().await?;
            println!("History cleared");
        }
        None => match ui::run(&store).await {
            // A closed stdin is a normal way to leave the wizard.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            other => other?,
        },
    }

    Ok(())
}
