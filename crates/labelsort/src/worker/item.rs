use std::path::{Path, PathBuf};

/// One image found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    path: PathBuf,
}

impl ImageItem {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as found on disk, for logs and error-directory placement.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    /// Extension including the leading dot, casing preserved (`".JPG"`).
    /// Empty when the file has none.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}
