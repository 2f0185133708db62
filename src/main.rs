use anyhow::{Context, Result};
use clap::Parser;
use saafsafai::cli::{Cli, Command, run_cli};
use saafsafai::config::AppPaths;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("saafsafai=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = Command::from(&Cli::parse());
    let paths = AppPaths::discover().context("failed to get home directory")?;

    run_cli(command, &paths).context(match command {
        Command::Setup => "Setup failed",
        Command::Cleanup => "Cleanup failed",
    })
}
