/// File categorization by extension.
///
/// This module maps lowercase file extensions (with their leading dot) to a
/// fixed set of categories. The extension table is an immutable value handed
/// to the classifier, so alternate tables can be used in tests.
///
/// # Examples
///
/// ```
/// use saafsafai::file_category::{Category, ExtensionClassifier};
///
/// let classifier = ExtensionClassifier::default();
/// assert_eq!(classifier.classify(".png"), Category::Images);
/// assert_eq!(classifier.classify(".PDF"), Category::Documents);
/// assert_eq!(classifier.classify(".unknown"), Category::Others);
/// ```
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Represents a broad file category.
///
/// The directory names returned by [`Category::dir_name`] are created directly
/// under the downloads root and are relied upon by other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// PDF, text and word-processor files
    Documents,
    /// Raster and vector images
    Images,
    /// Video containers
    Videos,
    /// Audio files
    Audio,
    /// Compressed archives
    Archives,
    /// Packages and installers
    Installers,
    /// Source code and markup
    Code,
    /// Anything the table does not list
    Others,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Category; 8] = [
        Category::Documents,
        Category::Images,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Installers,
        Category::Code,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use saafsafai::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Documents => "Documents",
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Installers => "Installers",
            Category::Code => "Code",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One row of a [`CategoryTable`]: a category and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase extensions including the leading dot.
    pub extensions: Vec<String>,
}

/// Ordered extension-to-category rules.
///
/// Rule order only matters when an extension is listed twice, which
/// [`CategoryTable::duplicate_extensions`] reports as a configuration defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Builds a table from `(category, extensions)` pairs.
    ///
    /// Extensions are lowercased; a missing leading dot is added.
    pub fn new<I, E, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Category, E)>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(category, extensions)| CategoryRule {
                category,
                extensions: extensions
                    .into_iter()
                    .map(|ext| normalize_extension(ext.as_ref()))
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// The built-in table used for the downloads sweep.
    pub fn standard() -> Self {
        Self::new([
            (
                Category::Documents,
                &[".pdf", ".txt", ".docx", ".doc", ".rtf", ".odt", ".pages"][..],
            ),
            (
                Category::Images,
                &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".webp", ".tiff"][..],
            ),
            (
                Category::Videos,
                &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".m4v"][..],
            ),
            (
                Category::Audio,
                &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a"][..],
            ),
            (
                Category::Archives,
                &[".zip", ".tar", ".gz", ".rar", ".7z", ".bz2", ".xz", ".tar.gz"][..],
            ),
            (
                Category::Installers,
                &[".deb", ".rpm", ".dmg", ".exe", ".msi", ".appimage", ".sh", ".pkg"][..],
            ),
            (
                Category::Code,
                &[".py", ".js", ".go", ".java", ".cpp", ".c", ".html", ".css", ".json"][..],
            ),
        ])
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Iterates over every `(extension, category)` pair in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Category)> {
        self.rules.iter().flat_map(|rule| {
            rule.extensions
                .iter()
                .map(move |ext| (ext.as_str(), rule.category))
        })
    }

    /// Returns every extension listed more than once, with the category that
    /// wins (first listed) and the one that loses.
    pub fn duplicate_extensions(&self) -> Vec<(String, Category, Category)> {
        let mut seen: HashMap<&str, Category> = HashMap::new();
        let mut duplicates = Vec::new();
        for (ext, category) in self.entries() {
            match seen.get(ext) {
                Some(&winner) => duplicates.push((ext.to_string(), winner, category)),
                None => {
                    seen.insert(ext, category);
                }
            }
        }
        duplicates
    }

    /// True when no extension appears under two rules.
    pub fn is_injective(&self) -> bool {
        self.duplicate_extensions().is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Maps file extensions to categories using a [`CategoryTable`].
#[derive(Debug, Clone)]
pub struct ExtensionClassifier {
    extension_map: HashMap<String, Category>,
}

impl ExtensionClassifier {
    /// Creates a classifier over `table`.
    ///
    /// If the table lists an extension twice, the first rule wins.
    pub fn new(table: &CategoryTable) -> Self {
        let mut extension_map = HashMap::new();
        for (ext, category) in table.entries() {
            extension_map.entry(ext.to_string()).or_insert(category);
        }
        Self { extension_map }
    }

    /// Maps an extension (leading dot included) to its category.
    ///
    /// Matching is exact and case-insensitive; anything unlisted is
    /// [`Category::Others`].
    ///
    /// # Examples
    ///
    /// ```
    /// use saafsafai::file_category::{Category, ExtensionClassifier};
    ///
    /// let classifier = ExtensionClassifier::default();
    /// assert_eq!(classifier.classify(".Mp3"), Category::Audio);
    /// assert_eq!(classifier.classify(""), Category::Others);
    /// ```
    pub fn classify(&self, extension: &str) -> Category {
        self.extension_map
            .get(&extension.to_lowercase())
            .copied()
            .unwrap_or(Category::Others)
    }
}

impl Default for ExtensionClassifier {
    fn default() -> Self {
        Self::new(&CategoryTable::standard())
    }
}

/// Returns the lowercase final extension of `path`, leading dot included.
///
/// The extension runs from the last `.` of the file name, so a name that is
/// nothing but an extension (`.part`) counts as one. Names without a dot have
/// no extension.
///
/// # Examples
///
/// ```
/// use saafsafai::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("report.PDF")).as_deref(), Some(".pdf"));
/// assert_eq!(extension_of(Path::new("backup.tar.gz")).as_deref(), Some(".gz"));
/// assert_eq!(extension_of(Path::new(".part")).as_deref(), Some(".part"));
/// assert_eq!(extension_of(Path::new("README")), None);
/// ```
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    name.rfind('.').map(|dot| name[dot..].to_lowercase())
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
