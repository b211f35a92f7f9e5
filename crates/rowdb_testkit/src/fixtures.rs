//! Test fixtures and database helpers.
//!
//! Provides the `User` entity used across the tests and temporary data
//! directories seeded with a known `User.json`.

use rowdb_core::{Config, Entity, EntityMetadata, EntityRegistry, JsonDb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `User.json` as shipped with the fixtures: one row, generator at 2.
pub const USER_SEED: &str = r#"{
  "idGenerator": 2,
  "rows": [
    {
      "id": 1,
      "username": "Foo",
      "age": 20
    }
  ]
}"#;

/// The fixture entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Engine-assigned identifier.
    pub id: Option<u64>,
    /// Login name.
    pub username: String,
    /// Age in years.
    pub age: i64,
}

impl User {
    /// Creates a user without an identifier.
    pub fn new(username: impl Into<String>, age: i64) -> Self {
        Self {
            id: None,
            username: username.into(),
            age,
        }
    }

    /// Creates a user with a manual identifier.
    pub fn with_id(id: u64, username: impl Into<String>, age: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(username, age)
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn metadata() -> EntityMetadata {
        EntityMetadata::new("User").fields(["username", "age"])
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "User(id={id}, username={}, age={})", self.username, self.age),
            None => write!(f, "User(id=null, username={}, age={})", self.username, self.age),
        }
    }
}

/// Returns a registry holding only [`User`].
pub fn user_registry() -> EntityRegistry {
    EntityRegistry::new()
        .register::<User>()
        .expect("User metadata is valid")
}

/// A temporary data directory with automatic cleanup.
pub struct TestDataDir {
    temp_dir: TempDir,
}

impl TestDataDir {
    /// Creates an empty data directory.
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a data directory holding [`USER_SEED`] as `User.json`.
    pub fn seeded() -> Self {
        let dir = Self::empty();
        dir.write_file("User.json", USER_SEED);
        dir
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the path of a file inside the directory.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Writes a file inside the directory.
    pub fn write_file(&self, name: &str, content: &str) {
        fs::write(self.file_path(name), content).expect("Failed to write fixture file");
    }

    /// Reads a file inside the directory.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.file_path(name)).expect("Failed to read data file")
    }

    /// Returns the content of the table file backing entity `T`.
    pub fn table_file<T: Entity>(&self) -> String {
        self.read_file(&Config::default().file_name(T::metadata().filename()))
    }

    /// Opens a [`JsonDb`] over this directory with the user registry.
    ///
    /// Sync is disabled to keep tests fast.
    pub fn open_users(&self) -> JsonDb {
        self.open_with(user_registry())
    }

    /// Opens a [`JsonDb`] over this directory with the given registry.
    pub fn open_with(&self, registry: EntityRegistry) -> JsonDb {
        JsonDb::open_with_config(self.path(), registry, Config::new().sync_on_write(false))
            .expect("Failed to open database")
    }
}

impl Default for TestDataDir {
    fn default() -> Self {
        Self::empty()
    }
}
