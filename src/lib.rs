//! saafsafai - personal machine housekeeping
//!
//! This library sorts a downloads directory into category folders, deletes
//! partial downloads, prunes `node_modules` directories that have not been
//! touched for 30 days, and records each run in a dated log file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod prune;
pub mod report;
pub mod setup;
pub mod summary;
pub mod sweep;
pub mod temp_filter;

pub use config::{AppPaths, Config, ConfigError};
pub use file_category::{Category, CategoryTable, ExtensionClassifier};
pub use file_organizer::{FileOrganizer, OrganizeError};
pub use prune::{NodeOutcome, PruneReport, SkipReason, StaleDirPruner};
pub use summary::RunSummary;
pub use sweep::DownloadsSweeper;
pub use temp_filter::TempFilter;

pub use cli::{CleanupOutcome, Command, run_cleanup, run_cli};
