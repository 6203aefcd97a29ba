//! Core timetable repository trait.
//!
//! This trait defines the fundamental storage operations for the base weekly
//! timetable: the recurring lesson grid that holds before any dated changes
//! are applied.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{BaseLesson, TimetableRow};

/// Repository trait for base timetable storage.
///
/// The base timetable is the recurring weekly grid: one row per
/// (class, weekday, period, subgroup) slot. Rows come back hydrated,
/// with subject and teacher records joined in, so callers never have
/// to chase reference IDs themselves.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is reachable and responding
    /// - `Ok(false)` if the backend is degraded but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Base Lesson Operations ====================

    /// Fetch the hydrated base lessons for one class on one weekday.
    ///
    /// # Arguments
    /// * `class_code` - The class identifier (e.g., "7a")
    /// * `weekday` - ISO weekday number, 1 = Monday .. 7 = Sunday
    ///
    /// # Returns
    /// * `Ok(Vec<TimetableRow>)` - Hydrated rows ordered by period number;
    ///   empty when the class has no lessons that day
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_base_lessons(
        &self,
        class_code: &str,
        weekday: u8,
    ) -> RepositoryResult<Vec<TimetableRow>>;

    /// Insert base lessons, replacing any existing row with the same
    /// (class, weekday, period, subgroup) natural key.
    ///
    /// # Arguments
    /// * `lessons` - The lessons to upsert
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows written
    /// * `Err(RepositoryError::ValidationError)` - If any lesson is out of range
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_base_lessons(&self, lessons: &[BaseLesson]) -> RepositoryResult<usize>;
}
