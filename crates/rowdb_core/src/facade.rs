//! Typed entity facade.

use crate::config::Config;
use crate::database::Database;
use crate::entity::{Entity, EntityRegistry};
use crate::error::{CoreError, CoreResult};
use rowdb_codec::{RowObject, Value};
use std::path::Path;

/// Typed access to a [`Database`] by entity type.
///
/// Every method resolves the entity through [`Entity::NAME`] and delegates to
/// the engine; the only work done here is converting between `T` and its
/// JSON row.
///
/// # Example
///
/// ```rust
/// use rowdb_core::{Entity, EntityMetadata, EntityRegistry, JsonDb};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
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
///
/// let registry = EntityRegistry::new().register::<User>().unwrap();
/// let db = JsonDb::open_in_memory(registry).unwrap();
///
/// let mut user = User { id: None, username: "Bar".into(), age: 40 };
/// let id = db.save(&mut user).unwrap();
/// assert_eq!(user.id, Some(id));
///
/// let found = db.find_one::<User>(id).unwrap().unwrap();
/// assert_eq!(found.username, "Bar");
/// ```
#[derive(Debug)]
pub struct JsonDb {
    database: Database,
}

impl JsonDb {
    /// Opens a directory-backed database with default configuration.
    ///
    /// # Errors
    ///
    /// See [`Database::open`].
    pub fn open(path: impl AsRef<Path>, registry: EntityRegistry) -> CoreResult<Self> {
        Database::open(path, registry).map(Self::new)
    }

    /// Opens a directory-backed database.
    ///
    /// # Errors
    ///
    /// See [`Database::open_with_config`].
    pub fn open_with_config(
        path: impl AsRef<Path>,
        registry: EntityRegistry,
        config: Config,
    ) -> CoreResult<Self> {
        Database::open_with_config(path, registry, config).map(Self::new)
    }

    /// Opens an in-memory database.
    ///
    /// # Errors
    ///
    /// See [`Database::open_in_memory`].
    pub fn open_in_memory(registry: EntityRegistry) -> CoreResult<Self> {
        Database::open_in_memory(registry).map(Self::new)
    }

    /// Wraps an already opened database.
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Returns the underlying engine.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Saves a new entity and writes the assigned identifier back into it.
    ///
    /// # Errors
    ///
    /// Returns `ManualIdentifierNotAllowed` if the entity already has an
    /// identifier; use [`replace`](Self::replace) for that.
    ///
    /// The entity with its new identifier is rebuilt before the row is
    /// stored, so a `Serialization` error leaves the table unchanged.
    pub fn save<T: Entity>(&self, entity: &mut T) -> CoreResult<u64> {
        let object = to_object(entity)?;
        let id_field = self.database.registry().resolve(T::NAME)?.id_field_name();

        let (id, saved) = self.database.save_with(T::NAME, object.clone(), |id| {
            let mut object = object;
            object.insert(id_field.to_string(), Value::from(id));
            from_object::<T>(T::NAME, object)
        })?;
        *entity = saved;
        Ok(id)
    }

    /// Returns all entities of type `T` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if `T` is not registered, or `Serialization`
    /// if a stored row no longer fits `T`.
    pub fn find_all<T: Entity>(&self) -> CoreResult<Vec<T>> {
        self.database
            .find_all(T::NAME)?
            .into_iter()
            .map(|object| from_object(T::NAME, object))
            .collect()
    }

    /// Returns the entity with the given identifier, if any.
    ///
    /// # Errors
    ///
    /// Same as [`find_all`](Self::find_all).
    pub fn find_one<T: Entity>(&self, id: u64) -> CoreResult<Option<T>> {
        self.database
            .find_one(T::NAME, id)?
            .map(|object| from_object(T::NAME, object))
            .transpose()
    }

    /// Updates a stored entity.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` or `NotFound`.
    pub fn update<T: Entity>(&self, entity: &T) -> CoreResult<()> {
        self.database.update(T::NAME, to_object(entity)?)
    }

    /// Removes the entity with the given identifier; absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` or a storage error.
    pub fn remove<T: Entity>(&self, id: u64) -> CoreResult<bool> {
        self.database.remove(T::NAME, id)
    }

    /// Stores an entity at its own identifier, inserting or overwriting.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` if the identifier is unset.
    pub fn replace<T: Entity>(&self, entity: &T) -> CoreResult<bool> {
        self.database.replace(T::NAME, to_object(entity)?)
    }

    /// Returns the number of stored entities of type `T`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity`.
    pub fn count<T: Entity>(&self) -> CoreResult<usize> {
        self.database.count(T::NAME)
    }

    /// Releases the database. See [`Database::destroy`].
    pub fn destroy(&self) {
        self.database.destroy();
    }
}

fn to_object<T: Entity>(entity: &T) -> CoreResult<RowObject> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(CoreError::serialization(
            T::NAME,
            format!("expected a JSON object, got {other}"),
        )),
        Err(e) => Err(CoreError::serialization(T::NAME, e.to_string())),
    }
}

fn from_object<T: Entity>(name: &str, object: RowObject) -> CoreResult<T> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| CoreError::serialization(name, e.to_string()))
}
