use std::path::{Path, PathBuf};

/// Extension given to every cached document
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// A document present in the local cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    /// Cache key, i.e. the file name without extension
    pub file_name: String,
    pub path: PathBuf,
}

impl CachedDocument {
    pub(crate) fn new(root: &Path, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let path = root.join(format!("{file_name}.{DOCUMENT_EXTENSION}"));

        CachedDocument { file_name, path }
    }

    /// File name including the extension, as presented to clients
    pub fn display_name(&self) -> String {
        format!("{}.{DOCUMENT_EXTENSION}", self.file_name)
    }
}

/// Derives the cache key for a submission title.
///
/// Only the title participates: two submissions sharing a title resolve to
/// the same cached file regardless of their URLs.
pub fn cache_key(title: &str) -> String {
    title.split(' ').collect::<Vec<_>>().join("_").to_lowercase()
}
