/// Moves files into category directories without overwriting anything.
///
/// This module creates category subdirectories under a root directory and
/// relocates files into them. When the destination name is taken, a numeric
/// suffix (`report_1.pdf`, `report_2.pdf`, ...) is inserted before the
/// extension.
use crate::file_category::Category;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Records a completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// The base name of the file before the move.
    pub file_name: String,
    /// The original path of the file.
    pub original_path: PathBuf,
    /// Where the file ended up.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: Category,
}

/// Errors that can occur while moving a file into its category.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source_error}", file.display(), destination.display())]
    FileMoveFailure {
        file: PathBuf,
        destination: PathBuf,
        #[source]
        source_error: std::io::Error,
    },
    /// The source path has no file name component.
    #[error("{} has no file name", path.display())]
    MissingFileName { path: PathBuf },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Organizes files by moving them into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves `file_path` into `<root>/<category>` and returns what happened.
    ///
    /// The category directory (and any missing ancestors) is created if
    /// needed; an existing directory is reused. The file keeps its stem, its
    /// extension is lowercased, and a collision suffix is added when the name
    /// is already taken. The move itself is a single `rename`, so it fails
    /// across filesystems rather than copying.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use saafsafai::file_category::Category;
    /// use saafsafai::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/home/me/Downloads"),
    ///     Path::new("/home/me/Downloads/photo.jpg"),
    ///     Category::Images,
    /// );
    ///
    /// match result {
    ///     Ok(record) => println!("Moved to {}", record.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        root: &Path,
        file_path: &Path,
        category: Category,
    ) -> OrganizeResult<MoveRecord> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| OrganizeError::MissingFileName {
                path: file_path.to_path_buf(),
            })?;

        let category_path = root.join(category.dir_name());
        fs::create_dir_all(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;

        let destination_path = resolve_destination(&category_path, &target_name(&file_name));

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            file: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        Ok(MoveRecord {
            file_name,
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category,
        })
    }
}

/// Returns the first free path for `file_name` inside `dir`.
///
/// `dir/file_name` is tried first, then `stem_1.ext`, `stem_2.ext` and so on.
/// Anything present at a path, including a dangling symlink, makes it taken.
///
/// # Examples
///
/// ```
/// use saafsafai::file_organizer::resolve_destination;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("a.txt"), "").unwrap();
/// assert_eq!(resolve_destination(dir.path(), "a.txt"), dir.path().join("a_1.txt"));
/// ```
pub fn resolve_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let (stem, ext) = split_name(file_name);
    (1u64..)
        .map(|n| dir.join(format!("{}_{}{}", stem, n, ext)))
        .find(|path| !is_taken(path))
        .unwrap_or(candidate)
}

/// The destination file name: original stem, lowercase extension.
fn target_name(file_name: &str) -> String {
    let (stem, ext) = split_name(file_name);
    format!("{}{}", stem, ext.to_lowercase())
}

/// Splits at the last `.`; the extension keeps its dot and may be the whole name.
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) => file_name.split_at(dot),
        None => (file_name, ""),
    }
}

fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
