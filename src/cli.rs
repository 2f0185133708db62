//! Command-line interface and cleanup driver.
//!
//! This module handles:
//! - Command parsing (clap)
//! - Loading configuration, which is fatal when it fails
//! - Running the downloads sweep and the dependency-directory pruner
//! - Writing the daily report

use crate::config::{AppPaths, Config, ConfigError};
use crate::prune::StaleDirPruner;
use crate::report;
use crate::setup::{self, SetupError};
use crate::summary::RunSummary;
use crate::sweep::DownloadsSweeper;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;
use tracing::info;

/// Keep a personal machine tidy.
///
/// Sorts ~/Downloads into category folders, deletes partial downloads and
/// removes node_modules folders untouched for 30 days.
#[derive(Debug, Parser)]
#[command(
    name = "saafsafai",
    version,
    after_help = "Configuration file location: ~/.config/saafsafai.json\nLogs location: ~/.local/share/saafsafai/logs/"
)]
pub struct Cli {
    /// Run interactive setup and install the systemd user service
    #[arg(long)]
    pub setup: bool,
}

/// Represents a command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clean up according to the saved configuration.
    Cleanup,
    /// Ask for configuration and install the service.
    Setup,
}

impl From<&Cli> for Command {
    fn from(cli: &Cli) -> Self {
        if cli.setup {
            Command::Setup
        } else {
            Command::Cleanup
        }
    }
}

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write log file in {}: {source}", dir.display())]
    Log {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// What a cleanup run produced.
#[derive(Debug)]
pub struct CleanupOutcome {
    pub summary: RunSummary,
    pub report: String,
    pub log_file: PathBuf,
}

/// Runs the selected command against `paths`.
pub fn run_cli(command: Command, paths: &AppPaths) -> Result<(), CleanupError> {
    match command {
        Command::Setup => Ok(setup::run_setup(paths)?),
        Command::Cleanup => {
            let outcome = run_cleanup(paths, SystemTime::now())?;
            if report::is_interactive_env() {
                report::echo(&outcome.report);
            }
            Ok(())
        }
    }
}

/// Loads configuration, runs the enabled phases and writes the daily log.
///
/// Configuration problems abort before anything is touched. Every other
/// failure is per-item and ends up in the returned summary.
///
/// # Examples
///
/// ```no_run
/// use saafsafai::cli::run_cleanup;
/// use saafsafai::config::AppPaths;
/// use std::time::SystemTime;
///
/// let paths = AppPaths::discover().expect("no home directory");
/// let outcome = run_cleanup(&paths, SystemTime::now()).expect("cleanup failed");
/// println!("{}", outcome.report);
/// ```
pub fn run_cleanup(paths: &AppPaths, now: SystemTime) -> Result<CleanupOutcome, CleanupError> {
    let config = Config::load(&paths.config_file)?;
    info!(
        clean_downloads = config.clean_downloads,
        delete_node_modules = config.delete_node_modules,
        "loaded configuration"
    );

    let mut summary = RunSummary::new();

    if config.clean_downloads {
        summary.merge(DownloadsSweeper::default().sweep(&paths.downloads));
    }

    if config.delete_node_modules {
        let report = StaleDirPruner::node_modules().prune(&paths.home, now);
        summary.merge(report.into_summary());
    }

    let timestamp = Local::now();
    let text = report::render(&summary, timestamp);
    let log_file = report::write_daily_log(&paths.log_dir, &text, timestamp.date_naive())
        .map_err(|source| CleanupError::Log {
            dir: paths.log_dir.clone(),
            source,
        })?;

    Ok(CleanupOutcome {
        summary,
        report: text,
        log_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_flags() {
        let cli = Cli::parse_from(["saafsafai"]);
        assert_eq!(Command::from(&cli), Command::Cleanup);

        let cli = Cli::parse_from(["saafsafai", "--setup"]);
        assert_eq!(Command::from(&cli), Command::Setup);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["saafsafai", "--undo"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
