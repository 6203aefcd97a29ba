//! Reference data repository trait.
//!
//! Classes, subjects and teachers are slow-moving reference tables. The
//! timetable and change log store their IDs and the backends hydrate them
//! back into full records on read.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{SchoolClass, Subject, Teacher};

/// Repository trait for reference data (classes, subjects, teachers).
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// List all known classes, ordered by grade then letter.
    async fn list_classes(&self) -> RepositoryResult<Vec<SchoolClass>>;

    /// Insert classes, replacing existing ones with the same code.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows written
    async fn insert_classes(&self, classes: &[SchoolClass]) -> RepositoryResult<usize>;

    /// Insert subjects, replacing existing ones with the same ID.
    async fn insert_subjects(&self, subjects: &[Subject]) -> RepositoryResult<usize>;

    /// Insert teachers, replacing existing ones with the same ID.
    async fn insert_teachers(&self, teachers: &[Teacher]) -> RepositoryResult<usize>;
}
