//! Storage module for schedule data.
//!
//! This module provides abstractions for storage operations via the Repository
//! pattern, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! The storage module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP server, client)                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (crate::services) - Schedule Resolution  │
//! │  - Base timetable + change log merge                    │
//! │  - Week assembly                                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │  Local (in-memory)            │
//!     │  SQLite (embedded, persistent)│
//!     └───────────────────────────────┘
//! ```
//!
//! # Repository Pattern
//! The module includes:
//! - `repository`: Trait definitions for storage operations
//! - `repositories::local`: In-memory implementation for unit testing and local development
//! - `repositories::sqlite`: Embedded SQLite implementation for persistent use
//! - `factory`: Factory for creating repository instances
//! - `seed`: Demo dataset for local development
//!
//! # Recommended Usage
//!
//! Construct one repository at startup and hand it to the services that
//! need it; nothing in this module holds global state.
//!
//! ```ignore
//! use lyceum_schedule::db::RepositoryFactory;
//!
//! let repo = RepositoryFactory::from_env()?;
//! let day = services::resolve_day(repo.as_ref(), "7a", date).await?;
//! ```

#[cfg(not(any(feature = "local-repo", feature = "sqlite-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod seed;

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

// Repository traits and implementations
pub use factory::{RepositoryFactory, RepositoryType, DB_PATH_ENV, REPOSITORY_TYPE_ENV};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use repositories::SqliteRepository;
pub use repository::{
    BellScheduleRepository, ChangeLogRepository, ErrorContext, FullRepository, ReferenceRepository,
    RepositoryError, RepositoryResult, TimetableRepository,
};

pub use seed::{seed_demo_data, SeedSummary};
