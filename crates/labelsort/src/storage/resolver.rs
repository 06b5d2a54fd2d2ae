use std::ffi::{OsStr, OsString};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Picks a file name inside one directory that does not collide with an
/// existing entry.
///
/// Candidates are tried in the order `base{ext}`, `base_1{ext}`,
/// `base_2{ext}`, ... with no upper bound.
#[derive(Debug, Clone)]
pub struct DestinationResolver {
    directory: PathBuf,
}

impl DestinationResolver {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the first candidate path with no filesystem entry.
    ///
    /// Check-then-return: only safe while no other writer touches the
    /// directory. Use [`DestinationResolver::claim`] when that cannot be
    /// guaranteed.
    pub fn resolve(&self, base_name: &str, extension: &str) -> PathBuf {
        self.first_free(OsStr::new(base_name), OsStr::new(extension))
    }

    /// [`DestinationResolver::resolve`] for an existing file name, split at its
    /// last dot. Works on raw `OsStr` so names that are not UTF-8 survive.
    pub fn resolve_file_name(&self, file_name: &OsStr) -> PathBuf {
        let name = Path::new(file_name);
        let stem = name.file_stem().unwrap_or(file_name);
        let extension = match name.extension() {
            Some(ext) => {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            }
            None => OsString::new(),
        };
        self.first_free(stem, &extension)
    }

    fn first_free(&self, base_name: &OsStr, extension: &OsStr) -> PathBuf {
        let mut counter = 0u64;
        loop {
            let path = self.candidate(base_name, extension, counter);
            // symlink_metadata so that dangling symlinks count as taken
            if std::fs::symlink_metadata(&path).is_err() {
                return path;
            }
            counter += 1;
        }
    }

    /// Atomically creates the first free candidate and returns it with an open
    /// handle. The same naming sequence as [`DestinationResolver::resolve`].
    pub fn claim(&self, base_name: &str, extension: &str) -> Result<(PathBuf, File), StorageError> {
        let mut counter = 0u64;
        loop {
            let path = self.candidate(OsStr::new(base_name), OsStr::new(extension), counter);

            // O_CREAT | O_EXCL
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    counter += 1;
                }
                Err(e) => {
                    return Err(StorageError::ClaimDestination { path, source: e });
                }
            }
        }
    }

    fn candidate(&self, base_name: &OsStr, extension: &OsStr, counter: u64) -> PathBuf {
        let mut filename = base_name.to_os_string();
        if counter > 0 {
            filename.push(format!("_{}", counter));
        }
        filename.push(extension);
        self.directory.join(filename)
    }
}
