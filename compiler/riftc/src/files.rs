//! Filesystem operations used by the build pipeline.
//!
//! None of these are transactional: a failure part way through leaves
//! whatever was already written on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("'{}' does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("couldn't delete '{}': {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't copy '{}' to '{}': {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't read '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Delete a folder with everything inside. A missing folder is not an error.
pub fn delete_dir(path: &Path) -> Result<(), FileError> {
    match fs::remove_dir_all(path) {
        Err(source) if source.kind() != io::ErrorKind::NotFound => Err(FileError::Delete {
            path: path.to_path_buf(),
            source,
        }),
        _ => Ok(()),
    }
}

/// Create a folder and any missing parents.
pub fn create_dir(path: &Path) -> Result<(), FileError> {
    fs::create_dir_all(path).map_err(|source| FileError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace a folder with an empty one.
pub fn recreate_dir(path: &Path) -> Result<(), FileError> {
    delete_dir(path)?;
    create_dir(path)
}

/// Copy the contents of `from` into `to`, merging with what `to` already holds.
pub fn copy_dir(from: &Path, to: &Path) -> Result<(), FileError> {
    if !from.is_dir() {
        return Err(FileError::Missing {
            path: from.to_path_buf(),
        });
    }

    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(|source| FileError::Walk {
            path: from.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| FileError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
        }
    }
    Ok(())
}
