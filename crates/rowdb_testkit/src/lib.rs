//! # RowDB Testkit
//!
//! Test utilities for RowDB.
//!
//! This crate provides:
//! - A `User` fixture entity and seeded temporary data directories
//! - Golden text assertions for table files
//! - Property-based operation generators using proptest
//! - A harness that checks the engine against an in-memory model
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowdb_testkit::prelude::*;
//!
//! let dir = TestDataDir::seeded();
//! let db = dir.open_users();
//! assert_eq!(db.count::<User>().unwrap(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;
pub mod integration;

#[cfg(test)]
mod scenarios;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
pub use integration::*;
