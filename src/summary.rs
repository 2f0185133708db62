//! Per-run record of what the cleanup did.
//!
//! Each phase returns its own [`RunSummary`]; the driver merges them and hands
//! the result to the report writer.

use std::fmt;
use std::path::PathBuf;

/// The kind of operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Deleting a temporary download.
    Delete,
    /// Moving a file into its category folder.
    Move,
    /// Removing a stale dependency directory.
    RemoveDir,
    /// Listing a directory.
    ReadDir,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Delete => "delete",
            Action::Move => "move",
            Action::RemoveDir => "remove",
            Action::ReadDir => "list",
        };
        f.write_str(verb)
    }
}

/// A single operation that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub action: Action,
    pub path: PathBuf,
    pub reason: String,
}

impl FailedItem {
    pub fn new(action: Action, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self {
            action,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Base names of deleted temporary files.
    pub deleted_files: Vec<String>,
    /// Base names (as found) of files moved into category folders.
    pub moved_files: Vec<String>,
    /// Full paths of removed dependency directories.
    pub removed_dirs: Vec<PathBuf>,
    pub failures: Vec<FailedItem>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends everything recorded in `other`, keeping order.
    pub fn merge(&mut self, other: RunSummary) {
        self.deleted_files.extend(other.deleted_files);
        self.moved_files.extend(other.moved_files);
        self.removed_dirs.extend(other.removed_dirs);
        self.failures.extend(other.failures);
    }

    /// Number of items that were actually cleaned.
    pub fn total_cleaned(&self) -> usize {
        self.deleted_files.len() + self.moved_files.len() + self.removed_dirs.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True when nothing was cleaned and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.total_cleaned() == 0 && !self.has_failures()
    }
}
