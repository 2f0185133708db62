//! Removes stale dependency directories (`node_modules`) under a tree.
//!
//! The walk is depth-first and never follows symlinks. A directory whose name
//! equals the sentinel is evaluated once and never descended into, whether
//! it is removed, kept, or fails to be removed. Nodes that cannot be read
//! are reported as skipped and the walk carries on with their siblings.

use crate::summary::{Action, FailedItem, RunSummary};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory name that marks a dependency cache.
pub const NODE_MODULES: &str = "node_modules";

/// Dependency caches untouched for longer than this are removed.
pub const MAX_AGE_DAYS: u64 = 30;

const SECS_PER_DAY: u64 = 86_400;

/// Why a node was passed over without any deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The walk could not read this node (permissions, vanished entry, loop).
    Unreadable(String),
    /// A sentinel directory whose modification time could not be read.
    MetadataUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(reason) => write!(f, "unreadable: {}", reason),
            SkipReason::MetadataUnavailable(reason) => {
                write!(f, "modification time unavailable: {}", reason)
            }
        }
    }
}

/// Result of visiting one node of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    /// A stale sentinel directory that was deleted.
    Removed(PathBuf),
    /// A sentinel directory that is still fresh enough to keep.
    Retained { path: PathBuf, age: Duration },
    /// A stale sentinel directory whose deletion failed.
    RemovalFailed { path: PathBuf, reason: String },
    /// A node the walk could not evaluate.
    Skipped {
        path: Option<PathBuf>,
        reason: SkipReason,
    },
}

/// Everything the pruner saw, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub outcomes: Vec<NodeOutcome>,
}

impl PruneReport {
    pub fn removed(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            NodeOutcome::Removed(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn retained(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            NodeOutcome::Retained { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (Option<&Path>, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            NodeOutcome::Skipped { path, reason } => Some((path.as_deref(), reason)),
            _ => None,
        })
    }

    /// Number of sentinel directories that were evaluated against the cutoff.
    pub fn evaluated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o, NodeOutcome::Skipped { .. }))
            .count()
    }

    /// Converts removals and removal failures into a [`RunSummary`].
    ///
    /// Skips stay out of the summary: unreadable corners of a home directory
    /// are routine and not something the user acted on.
    pub fn into_summary(self) -> RunSummary {
        let mut summary = RunSummary::new();
        for outcome in self.outcomes {
            match outcome {
                NodeOutcome::Removed(path) => summary.removed_dirs.push(path),
                NodeOutcome::RemovalFailed { path, reason } => summary
                    .failures
                    .push(FailedItem::new(Action::RemoveDir, path, reason)),
                NodeOutcome::Retained { .. } | NodeOutcome::Skipped { .. } => {}
            }
        }
        summary
    }
}

/// Finds directories named `sentinel` and removes those older than `max_age`.
#[derive(Debug, Clone)]
pub struct StaleDirPruner {
    sentinel: String,
    max_age: Duration,
}

impl StaleDirPruner {
    pub fn new(sentinel: impl Into<String>, max_age: Duration) -> Self {
        Self {
            sentinel: sentinel.into(),
            max_age,
        }
    }

    /// `node_modules` directories older than 30 days.
    pub fn node_modules() -> Self {
        Self::new(NODE_MODULES, Duration::from_secs(MAX_AGE_DAYS * SECS_PER_DAY))
    }

    /// Walks `root` and prunes every stale sentinel directory.
    ///
    /// A directory qualifies when its modification time is strictly earlier
    /// than `now - max_age`; one modified exactly at the cutoff is kept.
    pub fn prune(&self, root: &Path, now: SystemTime) -> PruneReport {
        let cutoff = now.checked_sub(self.max_age).unwrap_or(SystemTime::UNIX_EPOCH);
        let sentinel = OsStr::new(&self.sentinel);
        let mut report = PruneReport::default();

        let mut walker = WalkDir::new(root).follow_links(false).into_iter();
        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf);
                    debug!(path = ?path, error = %e, "skipping unreadable node");
                    report.outcomes.push(NodeOutcome::Skipped {
                        path,
                        reason: SkipReason::Unreadable(e.to_string()),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_dir() || entry.file_name() != sentinel {
                continue;
            }

            walker.skip_current_dir();
            let path = entry.into_path();
            report.outcomes.push(evaluate(path, cutoff, now));
        }

        let removed = report.removed().count();
        let skipped = report.skipped().count();
        info!(
            root = %root.display(),
            removed,
            evaluated = report.evaluated(),
            skipped,
            "dependency directory scan finished"
        );
        report
    }
}

impl Default for StaleDirPruner {
    fn default() -> Self {
        Self::node_modules()
    }
}

fn evaluate(path: PathBuf, cutoff: SystemTime, now: SystemTime) -> NodeOutcome {
    let modified = match fs::symlink_metadata(&path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot read modification time");
            return NodeOutcome::Skipped {
                path: Some(path),
                reason: SkipReason::MetadataUnavailable(e.to_string()),
            };
        }
    };

    if modified >= cutoff {
        let age = now.duration_since(modified).unwrap_or_default();
        debug!(path = %path.display(), age_days = age.as_secs() / SECS_PER_DAY, "keeping recent directory");
        return NodeOutcome::Retained { path, age };
    }

    match fs::remove_dir_all(&path) {
        Ok(()) => {
            info!(path = %path.display(), "removed stale directory");
            NodeOutcome::Removed(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove stale directory");
            NodeOutcome::RemovalFailed {
                path,
                reason: e.to_string(),
            }
        }
    }
}
