//! Repository implementations module.
//!
//! This module contains different implementations of the repository traits:
//! - `local`: In-memory implementation for unit testing and local development
//! - `sqlite`: Embedded SQLite implementation for persistent single-node use

#[cfg(feature = "local-repo")]
pub mod local;
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use sqlite::SqliteRepository;
