//! # RowDB Storage
//!
//! Storage backend trait and implementations for RowDB.
//!
//! Backends are **opaque blob stores** keyed by name. Each blob is replaced as
//! a whole on every write; there are no partial or append writes.
//!
//! ## Design Principles
//!
//! - A write either leaves the previous blob intact or fully replaces it
//! - No knowledge of the JSON document format
//! - Must be `Send + Sync` for concurrent access
//! - RowDB owns all format interpretation
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - One file per name inside a data directory
//!
//! ## Example
//!
//! ```rust
//! use rowdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.write("User.json", b"{}").unwrap();
//! assert_eq!(backend.read("User.json").unwrap(), Some(b"{}".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_name, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
