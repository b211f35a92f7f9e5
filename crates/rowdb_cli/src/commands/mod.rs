//! CLI command implementations.

pub mod dump;
pub mod inspect;
pub mod list;
pub mod verify;

use crate::error::{CliError, CliResult};
use rowdb_codec::{decode_document, TableDocument};
use rowdb_storage::{FileBackend, StorageBackend};
use std::path::PathBuf;
use tracing::debug;

/// A data directory opened read-only for the commands.
pub struct TableDir {
    backend: FileBackend,
    extension: String,
    id_field: String,
}

impl TableDir {
    /// Opens an existing data directory.
    pub fn open(path: PathBuf, extension: &str, id_field: &str) -> CliResult<Self> {
        Ok(Self {
            backend: FileBackend::open(&path, false)?,
            extension: extension.to_string(),
            id_field: id_field.to_string(),
        })
    }

    /// The identifier field name rows are expected to carry.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Base names of all table files, sorted.
    pub fn table_names(&self) -> CliResult<Vec<String>> {
        Ok(self
            .backend
            .list()?
            .into_iter()
            .filter_map(|file| file.strip_suffix(&self.extension).map(str::to_string))
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// The file name a table base name maps to.
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}{}", self.extension)
    }

    /// Reads and decodes one table file.
    pub fn load(&self, name: &str) -> CliResult<TableDocument> {
        let file = self.file_name(name);
        let bytes = self
            .backend
            .read(&file)?
            .ok_or_else(|| CliError::TableNotFound(file.clone()))?;
        debug!(file = %file, bytes = bytes.len(), "table file read");

        decode_document(&bytes).map_err(|source| CliError::Codec { file, source })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::TableDir;
    use std::fs;
    use tempfile::TempDir;

    pub const USER_FILE: &str = "{\n  \"idGenerator\": 3,\n  \"rows\": [\n    {\n      \"id\": 1,\n      \"username\": \"Foo\",\n      \"age\": 20\n    },\n    {\n      \"id\": 2,\n      \"username\": \"Bar\",\n      \"age\": 40\n    }\n  ]\n}";

    pub fn table_dir(files: &[(&str, &str)]) -> (TempDir, TableDir) {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).unwrap();
        }
        let dir = TableDir::open(temp.path().to_path_buf(), ".json", "id").unwrap();
        (temp, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::*;
    use crate::error::CliError;

    #[test]
    fn table_names_filter_by_extension() {
        let (_temp, dir) = table_dir(&[
            ("User.json", USER_FILE),
            ("notes.txt", "x"),
            (".json", "x"),
        ]);
        assert_eq!(dir.table_names().unwrap(), vec!["User"]);
    }

    #[test]
    fn load_missing_table() {
        let (_temp, dir) = table_dir(&[]);
        assert!(matches!(dir.load("User"), Err(CliError::TableNotFound(_))));
    }

    #[test]
    fn load_reports_file_on_decode_error() {
        let (_temp, dir) = table_dir(&[("User.json", "{")]);
        let err = dir.load("User").unwrap_err();
        assert!(err.to_string().starts_with("User.json: "));
    }
}
