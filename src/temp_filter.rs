//! Recognizes partial and temporary downloads.
//!
//! Files with these extensions are deleted by the downloads sweep instead of
//! being sorted into a category folder.

use crate::file_category::{CategoryTable, normalize_extension};
use std::collections::HashSet;

/// Extensions left behind by browsers and download managers.
pub const TEMP_EXTENSIONS: [&str; 4] = [".tmp", ".part", ".crdownload", ".download"];

#[derive(Debug, Clone)]
pub struct TempFilter {
    extensions: HashSet<String>,
}

impl TempFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Membership test; case-insensitive, leading dot included.
    pub fn is_temporary(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_lowercase())
    }

    /// Extensions claimed both by this filter and by `table`, sorted.
    pub fn overlap(&self, table: &CategoryTable) -> Vec<String> {
        let mut shared: Vec<String> = table
            .entries()
            .filter(|(ext, _)| self.extensions.contains(*ext))
            .map(|(ext, _)| ext.to_string())
            .collect();
        shared.sort();
        shared.dedup();
        shared
    }
}

impl Default for TempFilter {
    fn default() -> Self {
        Self::new(TEMP_EXTENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::Category;

    #[test]
    fn test_all_temp_extensions_recognized() {
        let filter = TempFilter::default();
        for ext in TEMP_EXTENSIONS {
            assert!(filter.is_temporary(ext), "{} should be temporary", ext);
        }
    }

    #[test]
    fn test_case_insensitive() {
        let filter = TempFilter::default();
        assert!(filter.is_temporary(".TMP"));
        assert!(filter.is_temporary(".CrDownload"));
    }

    #[test]
    fn test_regular_extensions_not_temporary() {
        let filter = TempFilter::default();
        assert!(!filter.is_temporary(".pdf"));
        assert!(!filter.is_temporary(""));
        assert!(!filter.is_temporary("tmp"));
    }

    #[test]
    fn test_disjoint_from_standard_table() {
        let filter = TempFilter::default();
        assert!(filter.overlap(&CategoryTable::standard()).is_empty());
    }

    #[test]
    fn test_overlap_detected() {
        let filter = TempFilter::default();
        let table = CategoryTable::new([(Category::Documents, vec![".part", ".pdf"])]);
        assert_eq!(filter.overlap(&table), vec![".part".to_string()]);
    }
}
