use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ConfigError, WorkerError};
use crate::worker::item::ImageItem;

/// Lists the images directly inside a source directory.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    patterns: Vec<Pattern>,
}

impl DirectoryScanner {
    /// `patterns` are file-name globs such as `*.jpg`, matched case-sensitively.
    pub fn new<P: AsRef<Path>>(input_directory: P, patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::InvalidExtensionPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            patterns,
        })
    }

    /// A missing source directory yields no items rather than an error.
    /// Symlinked images are listed under the link's own name; links that
    /// cannot be followed are skipped with a warning.
    pub fn scan(&self) -> Result<Vec<ImageItem>, WorkerError> {
        if !self.input_directory.is_dir() {
            info!(
                "Source directory {} does not exist; nothing to do",
                self.input_directory.display()
            );
            return Ok(Vec::new());
        }

        let mut items = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1) // top level only
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // A broken link fails only itself
                Err(e) if e.depth() > 0 => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(WorkerError::ScanFailed {
                        path: self.input_directory.clone(),
                        source: e,
                    });
                }
            };

            if !entry.file_type().is_file() {
                debug!("Skipping non-file entry: {}", entry.path().display());
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if self.is_allowed(&file_name) {
                debug!("Found image: {}", entry.path().display());
                items.push(ImageItem::new(entry.path().to_path_buf()));
            }
        }

        info!(
            "Scanned {} images in {}",
            items.len(),
            self.input_directory.display()
        );
        Ok(items)
    }

    fn is_allowed(&self, file_name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(file_name, options))
    }
}
