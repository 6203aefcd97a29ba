//! Repository trait definitions for schedule storage.
//!
//! This module provides a collection of focused repository traits that abstract
//! storage operations. By splitting responsibilities across multiple traits,
//! implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`timetable`]: Base weekly timetable rows and health checks
//! - [`changes`]: Dated change log with sequence-ordered application
//! - [`bells`]: Named bell timetables (period start/end times)
//! - [`reference`]: Classes, subjects and teachers
//!
//! # Trait Composition
//!
//! A complete repository implementation typically implements all traits:
//!
//! ```ignore
//! impl TimetableRepository for MyRepo { ... }
//! impl ChangeLogRepository for MyRepo { ... }
//! impl BellScheduleRepository for MyRepo { ... }
//! impl ReferenceRepository for MyRepo { ... }
//! ```
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service(repo: &dyn FullRepository) -> RepositoryResult<()> {
//!     let rows = repo.fetch_base_lessons("7a", 1).await?;
//!     let changes = repo.fetch_changes("7a", date).await?;
//!     Ok(())
//! }
//! ```

pub mod bells;
pub mod changes;
pub mod error;
pub mod reference;
pub mod timetable;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use bells::BellScheduleRepository;
pub use changes::ChangeLogRepository;
pub use reference::ReferenceRepository;
pub use timetable::TimetableRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all four repository traits. Use this as a convenient bound when you
/// need access to all storage operations, or as a trait object
/// (`Arc<dyn FullRepository>`) when the backend is chosen at runtime.
pub trait FullRepository:
    TimetableRepository + ChangeLogRepository + BellScheduleRepository + ReferenceRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: TimetableRepository + ChangeLogRepository + BellScheduleRepository + ReferenceRepository
{
}

impl std::fmt::Debug for dyn FullRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FullRepository")
    }
}
