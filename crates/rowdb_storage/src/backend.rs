//! Storage backend trait definition.

use crate::error::{StorageError, StorageResult};

/// A whole-blob storage backend for RowDB.
///
/// Backends are **opaque blob stores** keyed by a flat name such as
/// `User.json`. RowDB owns the content format; backends only move bytes.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `write`
/// - `write` replaces the whole blob; a failed write leaves the previous blob intact
/// - `list` returns names in ascending order
/// - Backends must be `Send + Sync`; callers serialize writes to the same name
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the blob stored under `name`.
    ///
    /// Returns `None` if no blob has been written under that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the blob stored under `name` with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn write(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Returns whether a blob exists under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Removes the blob stored under `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn remove(&self, name: &str) -> StorageResult<()>;

    /// Lists the names of all stored blobs in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list(&self) -> StorageResult<Vec<String>>;
}

/// Checks that `name` is a single, non-hidden path component.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] for empty names, names containing a
/// path separator, and names starting with `.` (reserved for temp and lock files).
pub fn validate_name(name: &str) -> StorageResult<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');

    if invalid {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_name("User.json").is_ok());
        assert!(validate_name("order_items.json").is_ok());
    }

    #[test]
    fn rejects_paths_and_hidden_names() {
        for name in ["", ".rowdb.lock", "../User.json", "a/b.json", "a\\b.json"] {
            assert!(
                matches!(validate_name(name), Err(StorageError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
