//! cypherix CLI
//!
//! Explain, count and run predicate queries against a graph server.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::Cli;

/// Log to stderr so stdout stays clean for query output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "cypherix=debug" } else { "cypherix=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Not a tokio main: the Bolt session blocks on a runtime of its own.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}
