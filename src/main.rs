//! Binary entry point: install logging, parse arguments, and hand the command
//! to the shell over the record store.
use clap::Parser;
use library_records::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

/// Returning a `Result` bubbles storage failures (an unreadable database, a
/// corrupt collection) up to the terminal with their full context chain.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run(Cli::parse())
}
