//! # RowDB Core
//!
//! Core storage engine for RowDB.
//!
//! This crate provides:
//! - Entity metadata and the static entity registry
//! - Monotonic identifier generation per entity type
//! - Insertion-ordered row tables
//! - The [`Database`] engine: one JSON file per entity type, rewritten
//!   atomically after every mutating call
//! - The typed [`JsonDb`] facade

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
pub mod dir;
mod entity;
mod error;
mod facade;
pub mod table;

pub use config::{Config, DEFAULT_FILE_EXTENSION};
pub use database::Database;
pub use entity::{Entity, EntityMetadata, EntityRegistry, IdGenerator, DEFAULT_ID_FIELD};
pub use error::{CoreError, CoreResult};
pub use facade::JsonDb;
pub use table::{Row, RowTable, TableState};

/// Re-exported document format types.
pub use rowdb_codec::{RowObject, TableDocument};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
