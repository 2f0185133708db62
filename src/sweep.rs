//! Downloads sweep: delete partial downloads, sort everything else.
//!
//! Only the immediate children of the downloads root are considered.
//! Subdirectories, including category folders from earlier runs, are left
//! untouched. Entries are processed in whatever order the filesystem lists
//! them, so when two files in one run map to the same destination name the
//! collision suffix goes to whichever is listed second.

use crate::file_category::{ExtensionClassifier, extension_of};
use crate::file_organizer::FileOrganizer;
use crate::summary::{Action, FailedItem, RunSummary};
use crate::temp_filter::TempFilter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// What happened to one entry of the downloads directory.
#[derive(Debug)]
enum EntryOutcome {
    Deleted(String),
    Moved(String),
    Failed(FailedItem),
    Ignored,
}

/// Sweeps a downloads directory using a classifier and a temp filter.
#[derive(Debug, Clone, Default)]
pub struct DownloadsSweeper {
    classifier: ExtensionClassifier,
    temp_filter: TempFilter,
}

impl DownloadsSweeper {
    pub fn new(classifier: ExtensionClassifier, temp_filter: TempFilter) -> Self {
        Self {
            classifier,
            temp_filter,
        }
    }

    /// Processes every regular file directly under `root`.
    ///
    /// A missing root is not an error: it is logged and the returned summary
    /// is empty. A root that cannot be listed yields a single `ReadDir`
    /// failure. Per-file failures are logged and recorded; they never stop
    /// the sweep.
    pub fn sweep(&self, root: &Path) -> RunSummary {
        let mut summary = RunSummary::new();

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(root = %root.display(), "downloads directory does not exist, skipping sweep");
                return summary;
            }
            Err(e) => {
                error!(root = %root.display(), error = %e, "cannot list downloads directory");
                summary
                    .failures
                    .push(FailedItem::new(Action::ReadDir, root, e));
                return summary;
            }
        };

        for entry in entries {
            let outcome = match entry {
                Ok(entry) => self.process_entry(root, &entry),
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "failed to read directory entry");
                    EntryOutcome::Failed(FailedItem::new(Action::ReadDir, root, e))
                }
            };

            match outcome {
                EntryOutcome::Deleted(name) => summary.deleted_files.push(name),
                EntryOutcome::Moved(name) => summary.moved_files.push(name),
                EntryOutcome::Failed(item) => summary.failures.push(item),
                EntryOutcome::Ignored => {}
            }
        }

        info!(
            deleted = summary.deleted_files.len(),
            moved = summary.moved_files.len(),
            failed = summary.failures.len(),
            "downloads sweep finished"
        );
        summary
    }

    fn process_entry(&self, root: &Path, entry: &fs::DirEntry) -> EntryOutcome {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Symlinks are not followed; only plain files are touched.
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => {
                debug!(path = %path.display(), "not a regular file, skipping");
                return EntryOutcome::Ignored;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot determine file type");
                return EntryOutcome::Failed(FailedItem::new(Action::ReadDir, path, e));
            }
        }

        let extension = extension_of(&path).unwrap_or_default();

        if self.temp_filter.is_temporary(&extension) {
            return match fs::remove_file(&path) {
                Ok(()) => {
                    info!(file = %name, "deleted temporary file");
                    EntryOutcome::Deleted(name)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to delete temporary file");
                    EntryOutcome::Failed(FailedItem::new(Action::Delete, path, e))
                }
            };
        }

        let category = self.classifier.classify(&extension);
        match FileOrganizer::move_to_category(root, &path, category) {
            Ok(record) => {
                info!(
                    file = %record.file_name,
                    destination = %record.new_path.display(),
                    "moved file"
                );
                EntryOutcome::Moved(record.file_name)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to move file");
                EntryOutcome::Failed(FailedItem::new(Action::Move, path, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{Category, CategoryTable};
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let summary = DownloadsSweeper::default().sweep(&temp_dir.path().join("Downloads"));
        assert!(summary.is_empty());
    }

    #[test]
    fn test_root_that_is_a_file_records_failure() {
        let temp_dir = TempDir::new().unwrap();
        let bogus = temp_dir.path().join("Downloads");
        fs::write(&bogus, "").unwrap();

        let summary = DownloadsSweeper::default().sweep(&bogus);
        assert_eq!(summary.total_cleaned(), 0);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].action, Action::ReadDir);
    }

    #[test]
    fn test_temp_files_deleted_not_moved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("movie.mp4.part"), "").unwrap();
        fs::write(root.join("setup.CRDOWNLOAD"), "").unwrap();

        let summary = DownloadsSweeper::default().sweep(root);

        let mut deleted = summary.deleted_files.clone();
        deleted.sort();
        assert_eq!(deleted, vec!["movie.mp4.part", "setup.CRDOWNLOAD"]);
        assert!(summary.moved_files.is_empty());
        assert!(!root.join("movie.mp4.part").exists());
        assert!(!root.join("Others").exists());
    }

    #[test]
    fn test_bare_extension_names_are_classified() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".part"), "").unwrap();
        fs::write(root.join(".json"), "{}").unwrap();

        let summary = DownloadsSweeper::default().sweep(root);

        assert_eq!(summary.deleted_files, vec![".part"]);
        assert_eq!(summary.moved_files, vec![".json"]);
        assert!(!root.join(".part").exists());
        assert!(!root.join("Others/.part").exists());
        assert!(root.join("Code/.json").exists());
        assert!(!root.join("Others").exists());
    }

    #[test]
    fn test_subdirectories_are_not_touched() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Images")).unwrap();
        fs::write(root.join("Images/old.png"), "").unwrap();
        fs::create_dir_all(root.join("project")).unwrap();
        fs::write(root.join("project/notes.txt"), "").unwrap();

        let summary = DownloadsSweeper::default().sweep(root);

        assert!(summary.is_empty());
        assert!(root.join("Images/old.png").exists());
        assert!(root.join("project/notes.txt").exists());
        assert!(!root.join("Documents").exists());
    }

    #[test]
    fn test_files_without_extension_go_to_others() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("README"), "").unwrap();
        fs::write(root.join("data.xyz"), "").unwrap();

        let summary = DownloadsSweeper::default().sweep(root);

        assert_eq!(summary.moved_files.len(), 2);
        assert!(root.join("Others/README").exists());
        assert!(root.join("Others/data.xyz").exists());
    }

    #[test]
    fn test_custom_classifier_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("main.rs"), "").unwrap();

        let table = CategoryTable::new([(Category::Code, vec![".rs"])]);
        let sweeper = DownloadsSweeper::new(ExtensionClassifier::new(&table), TempFilter::default());
        let summary = sweeper.sweep(root);

        assert_eq!(summary.moved_files, vec!["main.rs"]);
        assert!(root.join("Code/main.rs").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target = temp_dir.path().join("Images");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("real.png"), "").unwrap();
        std::os::unix::fs::symlink(target.join("real.png"), root.join("link.png")).unwrap();

        let summary = DownloadsSweeper::default().sweep(root);

        assert!(summary.is_empty());
        assert!(fs::symlink_metadata(root.join("link.png")).is_ok());
    }
}
