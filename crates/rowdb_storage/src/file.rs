//! File-based storage backend for persistent storage.

use crate::backend::{validate_name, StorageBackend};
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Suffix for the temporary file a write goes through before the rename.
const TEMP_SUFFIX: &str = ".tmp";

/// A directory-backed storage backend.
///
/// Every blob is a regular file named after the blob inside `root`.
///
/// # Durability
///
/// A write goes to a hidden temporary file next to the target, which is then
/// renamed over the target. A crash leaves either the old or the new content,
/// never a half-written file. With `sync` enabled the temporary file is
/// fsynced before the rename and the directory after it.
///
/// # Thread Safety
///
/// Writes to different names may run concurrently. Writes to the same name
/// must be serialized by the caller.
///
/// # Example
///
/// ```no_run
/// use rowdb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("data"), true).unwrap();
/// backend.write("User.json", b"{}").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    sync: bool,
}

impl FileBackend {
    /// Opens a backend rooted at an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotADirectory`] if `root` is missing or is not a
    /// directory.
    pub fn open(root: &Path, sync: bool) -> StorageResult<Self> {
        if !root.is_dir() {
            return Err(StorageError::NotADirectory {
                path: root.display().to_string(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            sync,
        })
    }

    /// Opens a backend, creating the directory (and parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_with_create_dirs(root: &Path, sync: bool) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Self::open(root, sync)
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path a blob name maps to.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] if `name` is not a plain file name.
    pub fn path_of(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn temp_path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}{TEMP_SUFFIX}"))
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> io::Result<()> {
        File::open(&self.root)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> io::Result<()> {
        // NTFS journals metadata; directory handles cannot be fsynced
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.path_of(name)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_of(name)?;
        let temp_path = self.temp_path_of(name);

        let result = (|| -> StorageResult<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            if self.sync {
                file.sync_all()?;
            }
            drop(file);
            fs::rename(&temp_path, &path)?;
            Ok(())
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if self.sync {
            if let Err(source) = self.sync_directory() {
                return Err(StorageError::NotDurable {
                    name: name.to_string(),
                    source,
                });
            }
        }

        trace!(name, bytes = data.len(), "blob replaced");
        Ok(())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.path_of(name)?.is_file())
    }

    fn remove(&self, name: &str) -> StorageResult<()> {
        let path = self.path_of(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(&dir.path().join("missing"), false);
        assert!(matches!(result, Err(StorageError::NotADirectory { .. })));
    }

    #[test]
    fn open_with_create_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("data");

        let backend = FileBackend::open_with_create_dirs(&root, false).unwrap();
        assert!(root.is_dir());
        assert_eq!(backend.root(), root);
    }

    #[test]
    fn read_missing_is_none() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), false).unwrap();
        assert_eq!(backend.read("User.json").unwrap(), None);
        assert!(!backend.exists("User.json").unwrap());
    }

    #[test]
    fn write_and_read() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), true).unwrap();

        backend.write("User.json", b"first").unwrap();
        backend.write("User.json", b"second").unwrap();

        assert_eq!(backend.read("User.json").unwrap(), Some(b"second".to_vec()));
        assert_eq!(fs::read(dir.path().join("User.json")).unwrap(), b"second");
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), false).unwrap();

        backend.write("User.json", b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("User.json")]);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), false).unwrap();

        backend.write("User.json", b"data").unwrap();
        backend.remove("User.json").unwrap();
        backend.remove("User.json").unwrap();
        assert!(!backend.exists("User.json").unwrap());
    }

    #[test]
    fn list_skips_hidden_files_and_dirs() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), false).unwrap();

        backend.write("b.json", b"1").unwrap();
        backend.write("a.json", b"2").unwrap();
        fs::write(dir.path().join(".rowdb.lock"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        assert_eq!(backend.list().unwrap(), vec!["a.json", "b.json"]);
    }

    #[test]
    fn rejects_escaping_names() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), false).unwrap();

        let result = backend.write("../escape.json", b"x");
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }
}
