//! The storage engine.

use crate::config::Config;
use crate::dir::DataDir;
use crate::entity::{EntityMetadata, EntityRegistry};
use crate::error::{CoreError, CoreResult};
use crate::table::{split_object, Row, TableState};
use parking_lot::{Mutex, RwLock};
use rowdb_codec::{decode_document, encode_document, RowObject};
use rowdb_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One entity type's metadata, file and guarded state.
///
/// The mutex covers the row table, the generator and the file write, so a
/// read-modify-persist sequence is atomic relative to other callers.
struct EntitySlot {
    meta: EntityMetadata,
    file_name: String,
    /// `None` once the database has been destroyed.
    state: Mutex<Option<TableState>>,
}

/// The main database handle.
///
/// `Database` owns one [`TableState`] per registered entity type for its
/// whole lifetime. It provides:
/// - Loading every entity file at open
/// - Row CRUD by entity name, on JSON objects
/// - A full rewrite of the entity's file after every mutating call
///
/// Operations on different entity types never contend; operations on the
/// same entity type are serialized.
///
/// # Example
///
/// ```rust
/// use rowdb_core::{Database, EntityMetadata, EntityRegistry};
/// use serde_json::json;
///
/// let registry = EntityRegistry::new()
///     .register_metadata("User", EntityMetadata::new("User").fields(["username", "age"]))
///     .unwrap();
/// let db = Database::open_in_memory(registry).unwrap();
///
/// let object = json!({"id": null, "username": "Bar", "age": 40});
/// let id = db.save("User", object.as_object().unwrap().clone()).unwrap();
/// assert_eq!(id, 1);
/// assert_eq!(db.count("User").unwrap(), 1);
/// ```
pub struct Database {
    /// Configuration.
    config: Config,
    /// Data directory (holds the optional lock). None for custom backends.
    dir: Mutex<Option<DataDir>>,
    /// Where table files are read from and written to.
    backend: Arc<dyn StorageBackend>,
    /// Entity metadata provider.
    registry: EntityRegistry,
    /// Per-entity state, fixed at open.
    slots: HashMap<String, EntitySlot>,
    /// Whether the database is open.
    is_open: RwLock<bool>,
}

impl Database {
    /// Opens a database over a data directory with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or any entity
    /// file fails to load.
    pub fn open(path: impl AsRef<Path>, registry: EntityRegistry) -> CoreResult<Self> {
        Self::open_with_config(path, registry, Config::default())
    }

    /// Opens a database over a data directory.
    ///
    /// For every registered entity type the file `<filename><extension>` is
    /// loaded if present; otherwise the entity starts empty with the
    /// generator at `config.initial_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory is missing and `create_if_missing` is false
    /// - `exclusive_lock` is set and the directory is locked (`DatabaseLocked`)
    /// - A file is not a valid table document (`Codec`, `InvalidFormat`,
    ///   `DuplicateIdentifier`)
    /// - I/O errors occur
    pub fn open_with_config(
        path: impl AsRef<Path>,
        registry: EntityRegistry,
        config: Config,
    ) -> CoreResult<Self> {
        let dir = DataDir::open(path.as_ref(), config.create_if_missing, config.exclusive_lock)?;
        let backend = FileBackend::open(dir.path(), config.sync_on_write)?;
        Self::build(config, Some(dir), Arc::new(backend), registry)
    }

    /// Opens a database over an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity file fails to load.
    pub fn open_with_backend(
        registry: EntityRegistry,
        config: Config,
        backend: Arc<dyn StorageBackend>,
    ) -> CoreResult<Self> {
        Self::build(config, None, backend, registry)
    }

    /// Opens a fresh in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other constructors.
    pub fn open_in_memory(registry: EntityRegistry) -> CoreResult<Self> {
        Self::open_with_backend(registry, Config::default(), Arc::new(InMemoryBackend::new()))
    }

    fn build(
        config: Config,
        dir: Option<DataDir>,
        backend: Arc<dyn StorageBackend>,
        registry: EntityRegistry,
    ) -> CoreResult<Self> {
        let mut slots = HashMap::with_capacity(registry.len());

        for (name, meta) in registry.iter() {
            let file_name = config.file_name(meta.filename());
            let state = Self::load(backend.as_ref(), &config, name, meta, &file_name)?;
            slots.insert(
                name.to_string(),
                EntitySlot {
                    meta: meta.clone(),
                    file_name,
                    state: Mutex::new(Some(state)),
                },
            );
        }

        info!(
            entities = slots.len(),
            path = ?dir.as_ref().map(DataDir::path),
            "database opened"
        );

        Ok(Self {
            config,
            dir: Mutex::new(dir),
            backend,
            registry,
            slots,
            is_open: RwLock::new(true),
        })
    }

    fn load(
        backend: &dyn StorageBackend,
        config: &Config,
        name: &str,
        meta: &EntityMetadata,
        file_name: &str,
    ) -> CoreResult<TableState> {
        let state = match backend.read(file_name)? {
            Some(bytes) if !bytes.is_empty() => {
                TableState::from_document(name, meta, decode_document(&bytes)?)?
            }
            _ => TableState::empty(name, config.initial_id),
        };

        debug!(
            entity = name,
            file = file_name,
            rows = state.rows.len(),
            id_generator = state.generator.current(),
            "table loaded"
        );
        Ok(state)
    }

    /// Returns the configuration the database was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the entity registry.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Returns the data directory, if the database is directory-backed.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.dir.lock().as_ref().map(|d| d.path().to_path_buf())
    }

    /// Returns the registered entity names in name order.
    #[must_use]
    pub fn entity_names(&self) -> Vec<&str> {
        self.registry.iter().map(|(name, _)| name).collect()
    }

    /// Returns whether the database is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.is_open.read()
    }

    /// Saves a new row and returns the identifier assigned to it.
    ///
    /// `object` is the entity as a JSON object; its identifier field must be
    /// missing or `null`.
    ///
    /// # Errors
    ///
    /// Returns `ManualIdentifierNotAllowed` if the identifier is set; the
    /// table and file are left untouched. Returns `UnknownEntity`,
    /// `InvalidIdentifier`, `DatabaseClosed` or a storage error otherwise.
    pub fn save(&self, entity: &str, object: RowObject) -> CoreResult<u64> {
        self.save_with(entity, object, |_| Ok(())).map(|(id, ())| id)
    }

    /// Saves a new row, first passing the identifier it will get to `accept`.
    ///
    /// `accept` runs under the entity lock before anything is stored; if it
    /// fails, neither the generator, the table nor the file change.
    ///
    /// # Errors
    ///
    /// Returns the error from `accept`, or any error [`save`](Self::save)
    /// returns.
    pub fn save_with<R>(
        &self,
        entity: &str,
        object: RowObject,
        accept: impl FnOnce(u64) -> CoreResult<R>,
    ) -> CoreResult<(u64, R)> {
        let slot = self.slot(entity)?;
        let (id, values) = split_object(entity, &slot.meta, object)?;
        if let Some(id) = id {
            return Err(CoreError::ManualIdentifierNotAllowed {
                entity: entity.to_string(),
                id,
            });
        }

        self.mutate(entity, slot, |state| {
            let accepted = accept(state.generator.current())?;
            let id = state.generator.next();
            state.rows.insert(Row::new(id, values))?;
            Ok((id, accepted))
        })
    }

    /// Returns all rows of an entity type in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` or `DatabaseClosed`.
    pub fn find_all(&self, entity: &str) -> CoreResult<Vec<RowObject>> {
        self.read(entity, |slot, state| {
            state
                .rows
                .iter()
                .map(|row| row.to_object(slot.meta.id_field_name()))
                .collect()
        })
    }

    /// Returns the row with the given identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` or `DatabaseClosed`.
    pub fn find_one(&self, entity: &str, id: u64) -> CoreResult<Option<RowObject>> {
        self.read(entity, |slot, state| {
            state
                .rows
                .find_one(id)
                .map(|row| row.to_object(slot.meta.id_field_name()))
        })
    }

    /// Replaces the field values of an existing row, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` if the identifier is unset and `NotFound`
    /// if no row has it.
    pub fn update(&self, entity: &str, object: RowObject) -> CoreResult<()> {
        let slot = self.slot(entity)?;
        let row = Row::from_object(entity, &slot.meta, object)?;
        self.mutate(entity, slot, |state| state.rows.update(row))
    }

    /// Removes the row with the given identifier.
    ///
    /// Removing an absent identifier is not an error; the file is rewritten
    /// either way. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity`, `DatabaseClosed` or a storage error.
    pub fn remove(&self, entity: &str, id: u64) -> CoreResult<bool> {
        let slot = self.slot(entity)?;
        self.mutate(entity, slot, |state| Ok(state.rows.remove(id).is_some()))
    }

    /// Stores a row at a caller-chosen identifier.
    ///
    /// Overwrites an existing row in place or appends a new one. The
    /// generator is raised past the identifier if needed, so a later `save`
    /// cannot collide with it. Returns whether a row was overwritten.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` if the identifier is unset.
    pub fn replace(&self, entity: &str, object: RowObject) -> CoreResult<bool> {
        let slot = self.slot(entity)?;
        let row = Row::from_object(entity, &slot.meta, object)?;
        self.mutate(entity, slot, |state| {
            state.generator.observe(row.id());
            Ok(state.rows.upsert(row))
        })
    }

    /// Returns the number of rows of an entity type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` or `DatabaseClosed`.
    pub fn count(&self, entity: &str) -> CoreResult<usize> {
        self.read(entity, |_, state| state.rows.len())
    }

    /// Returns the identifier the next `save` will assign, without consuming it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` or `DatabaseClosed`.
    pub fn id_generator(&self, entity: &str) -> CoreResult<u64> {
        self.read(entity, |_, state| state.generator.current())
    }

    /// Discards the in-memory state of an entity type and loads its file again.
    ///
    /// # Errors
    ///
    /// Returns an error if the file fails to load; the previous state is kept.
    pub fn reload(&self, entity: &str) -> CoreResult<()> {
        let slot = self.slot(entity)?;
        let mut guard = slot.state.lock();
        if guard.is_none() {
            return Err(CoreError::DatabaseClosed);
        }
        let state = Self::load(
            self.backend.as_ref(),
            &self.config,
            entity,
            &slot.meta,
            &slot.file_name,
        )?;
        *guard = Some(state);
        Ok(())
    }

    /// Releases all in-memory tables and the directory lock.
    ///
    /// Every later operation fails with `DatabaseClosed`. Files on disk are
    /// left as last written. Calling `destroy` twice is a no-op.
    pub fn destroy(&self) {
        let mut is_open = self.is_open.write();
        if !*is_open {
            return;
        }

        for slot in self.slots.values() {
            *slot.state.lock() = None;
        }
        if let Some(mut dir) = self.dir.lock().take() {
            dir.unlock();
        }
        *is_open = false;

        info!("database destroyed");
    }

    fn slot(&self, entity: &str) -> CoreResult<&EntitySlot> {
        self.slots
            .get(entity)
            .ok_or_else(|| CoreError::unknown_entity(entity))
    }

    fn read<R>(&self, entity: &str, f: impl FnOnce(&EntitySlot, &TableState) -> R) -> CoreResult<R> {
        let slot = self.slot(entity)?;
        let guard = slot.state.lock();
        let state = guard.as_ref().ok_or(CoreError::DatabaseClosed)?;
        Ok(f(slot, state))
    }

    /// Applies `f` to the entity's state and persists the result.
    ///
    /// If `f` or the write fails, the state is restored to what it was
    /// before the call. A write that replaced the file before failing keeps
    /// the new state, so memory matches the file.
    fn mutate<R>(
        &self,
        entity: &str,
        slot: &EntitySlot,
        f: impl FnOnce(&mut TableState) -> CoreResult<R>,
    ) -> CoreResult<R> {
        let mut guard = slot.state.lock();
        let state = guard.as_mut().ok_or(CoreError::DatabaseClosed)?;
        let before = state.clone();

        let result = f(&mut *state).and_then(|value| {
            self.persist(entity, slot, state)?;
            Ok(value)
        });
        match &result {
            Err(e) if e.is_committed() => {
                warn!(entity, error = %e, "table written but not synced, keeping new state");
            }
            Err(_) => *state = before,
            Ok(_) => {}
        }
        result
    }

    fn persist(&self, entity: &str, slot: &EntitySlot, state: &TableState) -> CoreResult<()> {
        let bytes = encode_document(&state.to_document(&slot.meta))?;
        self.backend.write(&slot.file_name, &bytes)?;

        debug!(
            entity,
            file = %slot.file_name,
            rows = state.rows.len(),
            bytes = bytes.len(),
            "table persisted"
        );
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .field("entities", &self.entity_names())
            .field("is_open", &self.is_open())
            .finish_non_exhaustive()
    }
}
