//! Entity metadata and the `Entity` trait.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Identifier field name used when none is declared.
pub const DEFAULT_ID_FIELD: &str = "id";

/// How one entity type is persisted.
///
/// Metadata is immutable once registered.
///
/// # Example
///
/// ```rust
/// use rowdb_core::EntityMetadata;
///
/// let meta = EntityMetadata::new("User").field("username").field("age");
/// assert_eq!(meta.id_field_name(), "id");
/// assert_eq!(meta.field_names(), ["username", "age"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    filename: String,
    id_field: String,
    fields: Vec<String>,
}

impl EntityMetadata {
    /// Creates metadata for the base filename, with the default `id` field
    /// and no other fields.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            fields: Vec::new(),
        }
    }

    /// Sets the identifier field.
    #[must_use]
    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    /// Appends a persisted field. Order of calls is the on-disk order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Appends several persisted fields in order.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns the base filename (without extension).
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the identifier field name.
    #[must_use]
    pub fn id_field_name(&self) -> &str {
        &self.id_field
    }

    /// Returns the persisted non-identifier fields in declared order.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Returns whether `name` is a declared non-identifier field.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

/// A type that can be stored by RowDB.
///
/// The identifier field must serialize as `null` while unset and as a
/// non-negative integer once assigned; an `Option<u64>` field does both.
///
/// # Example
///
/// ```rust
/// use rowdb_core::{Entity, EntityMetadata};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     id: Option<u64>,
///     username: String,
///     age: u32,
/// }
///
/// impl Entity for User {
///     const NAME: &'static str = "User";
///
///     fn metadata() -> EntityMetadata {
///         EntityMetadata::new("User").fields(["username", "age"])
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned {
    /// Registry key for this entity type.
    const NAME: &'static str;

    /// Returns how this entity type is persisted.
    fn metadata() -> EntityMetadata;
}
