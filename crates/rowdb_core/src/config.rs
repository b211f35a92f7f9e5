//! Database configuration.

/// Default suffix appended to each entity's base filename.
pub const DEFAULT_FILE_EXTENSION: &str = ".json";

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Suffix appended to every entity filename, e.g. `.json`.
    pub file_extension: String,

    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to fsync every table file (and its directory) on write.
    pub sync_on_write: bool,

    /// Whether to hold an advisory lock on the data directory.
    pub exclusive_lock: bool,

    /// Generator value for entity types that have no file yet.
    pub initial_id: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            create_if_missing: true,
            sync_on_write: true,
            exclusive_lock: false,
            initial_id: 1,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table file extension.
    #[must_use]
    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Sets whether to create the data directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to fsync on every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether to lock the data directory for exclusive use.
    #[must_use]
    pub const fn exclusive_lock(mut self, value: bool) -> Self {
        self.exclusive_lock = value;
        self
    }

    /// Sets the starting identifier for new entity types.
    #[must_use]
    pub const fn initial_id(mut self, value: u64) -> Self {
        self.initial_id = value;
        self
    }

    /// Returns the file name an entity's base filename maps to.
    #[must_use]
    pub fn file_name(&self, filename: &str) -> String {
        format!("{filename}{}", self.file_extension)
    }
}
