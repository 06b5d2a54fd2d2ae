use std::fs::{FileTimes, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::StorageError;
use crate::storage::DestinationResolver;

/// Move a file from `src` to `dst`. Uses `rename` first (atomic on the same
/// filesystem) and falls back to copy + delete for cross-device moves.
pub fn move_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    std::fs::copy(src, dst).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    copy_times(src, dst);
    std::fs::remove_file(src).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Creates `path` and any missing parents. Existing directories are fine.
pub fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Carries access and modification times over from `src` to `dst`.
/// Best effort: platforms without support just keep the copy's own times.
fn copy_times(src: &Path, dst: &Path) {
    let result = (|| -> std::io::Result<()> {
        let meta = std::fs::metadata(src)?;
        let times = FileTimes::new()
            .set_accessed(meta.accessed()?)
            .set_modified(meta.modified()?);
        OpenOptions::new().write(true).open(dst)?.set_times(times)
    })();

    if let Err(e) = result {
        debug!("Could not preserve timestamps on {}: {}", dst.display(), e);
    }
}

/// Where a copied image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    /// True when a `_N` suffix was needed to avoid an existing file.
    pub renamed: bool,
}

/// Places images into the output and error directories of one batch.
pub struct FileStorage {
    output: DestinationResolver,
    error: DestinationResolver,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(output_directory: P, error_directory: Q) -> Self {
        Self {
            output: DestinationResolver::new(output_directory),
            error: DestinationResolver::new(error_directory),
        }
    }

    /// Creates both directories, including missing parents.
    pub fn prepare(&self) -> Result<(), StorageError> {
        ensure_directory(self.output.directory())?;
        ensure_directory(self.error.directory())
    }

    /// Copies `source` into the output directory as `base_name + extension`,
    /// adding a `_N` suffix when that name is taken. The source stays in place.
    pub fn copy_to_output(
        &self,
        source: &Path,
        base_name: &str,
        extension: &str,
    ) -> Result<Placement, StorageError> {
        let (destination, claimed) = self.output.claim(base_name, extension)?;
        drop(claimed);

        if let Err(e) = std::fs::copy(source, &destination) {
            // Only the empty placeholder we just created is removed
            let _ = std::fs::remove_file(&destination);
            return Err(StorageError::CopyFile {
                from: source.to_path_buf(),
                to: destination,
                source: e,
            });
        }
        copy_times(source, &destination);

        let wanted = format!("{}{}", base_name, extension);
        let renamed = destination
            .file_name()
            .map(|name| name != wanted.as_str())
            .unwrap_or(false);

        Ok(Placement {
            path: destination,
            renamed,
        })
    }

    /// Moves `source` into the error directory under its own file name. If that
    /// name is already taken there, the resolver's `_N` suffix is added rather
    /// than overwriting.
    pub fn move_to_error(&self, source: &Path) -> Result<PathBuf, StorageError> {
        let Some(file_name) = source.file_name() else {
            return Err(StorageError::MoveFile {
                from: source.to_path_buf(),
                to: self.error.directory().to_path_buf(),
                source: std::io::Error::new(ErrorKind::InvalidInput, "source has no file name"),
            });
        };

        let destination = self.error.resolve_file_name(file_name);
        move_file(source, &destination)?;
        Ok(destination)
    }
}
