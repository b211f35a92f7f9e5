//! Data directory management.
//!
//! All table files of one database live flat in a single directory:
//!
//! ```text
//! <data_dir>/
//! ├─ .rowdb.lock       # Advisory lock (only with `exclusive_lock`)
//! ├─ User.json         # One table file per entity type
//! └─ Order.json
//! ```

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use rowdb_storage::StorageError;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Lock file name within the data directory.
const LOCK_FILE: &str = ".rowdb.lock";

/// An opened data directory, optionally holding an exclusive lock.
///
/// The lock is released when the `DataDir` is dropped.
#[derive(Debug)]
pub struct DataDir {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle, held for exclusive access.
    lock_file: Option<File>,
}

impl DataDir {
    /// Opens or creates a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path exists but is not a directory
    /// - `exclusive_lock` is set and another engine holds the lock
    ///   (returns `DatabaseLocked`)
    /// - I/O errors occur
    pub fn open(path: &Path, create_if_missing: bool, exclusive_lock: bool) -> CoreResult<Self> {
        if !path.exists() {
            if create_if_missing {
                fs::create_dir_all(path)?;
            } else {
                return Err(CoreError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("data directory does not exist: {}", path.display()),
                )));
            }
        }

        if !path.is_dir() {
            return Err(StorageError::NotADirectory {
                path: path.display().to_string(),
            }
            .into());
        }

        let lock_file = if exclusive_lock {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path.join(LOCK_FILE))?;

            if file.try_lock_exclusive().is_err() {
                return Err(CoreError::DatabaseLocked);
            }
            Some(file)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            lock_file,
        })
    }

    /// Returns the path to the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether this handle holds the directory lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_file.is_some()
    }

    /// Releases the directory lock, if held.
    pub fn unlock(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        self.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("data");

        let dir = DataDir::open(&path, true, false).unwrap();
        assert!(path.is_dir());
        assert_eq!(dir.path(), path);
        assert!(!dir.is_locked());
    }

    #[test]
    fn open_fails_if_not_exists_and_no_create() {
        let temp = tempdir().unwrap();
        let result = DataDir::open(&temp.path().join("missing"), false, false);
        assert!(
            matches!(&result, Err(CoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound),
            "{result:?}"
        );
    }

    #[test]
    fn open_fails_on_regular_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("file");
        fs::write(&path, b"x").unwrap();

        assert!(matches!(
            DataDir::open(&path, true, false),
            Err(CoreError::Storage(StorageError::NotADirectory { .. }))
        ));
    }

    #[test]
    fn lock_prevents_second_open() {
        let temp = tempdir().unwrap();

        let _first = DataDir::open(temp.path(), true, true).unwrap();
        let second = DataDir::open(temp.path(), true, true);
        assert!(matches!(second, Err(CoreError::DatabaseLocked)));
    }

    #[test]
    fn unlocked_open_ignores_lock() {
        let temp = tempdir().unwrap();

        let _first = DataDir::open(temp.path(), true, true).unwrap();
        assert!(DataDir::open(temp.path(), true, false).is_ok());
    }

    #[test]
    fn lock_released_on_drop_and_unlock() {
        let temp = tempdir().unwrap();

        {
            let _dir = DataDir::open(temp.path(), true, true).unwrap();
        }
        let mut dir = DataDir::open(temp.path(), true, true).unwrap();
        dir.unlock();
        assert!(!dir.is_locked());
        assert!(DataDir::open(temp.path(), true, true).is_ok());
    }
}
