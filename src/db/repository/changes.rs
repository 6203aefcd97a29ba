//! Change log repository trait.
//!
//! Dated schedule changes (cancellations, replacements, teacher swaps and
//! time moves) live in an append-only log. Each recorded change receives a
//! storage-assigned sequence number, and readers apply changes in sequence
//! order so the outcome of overlapping edits is deterministic.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{Change, ChangeRow, NewChange};

/// Repository trait for the dated change log.
#[async_trait]
pub trait ChangeLogRepository: Send + Sync {
    /// Fetch the hydrated changes for one class on one calendar date,
    /// ordered by ascending sequence number.
    ///
    /// # Arguments
    /// * `class_code` - The class identifier (e.g., "7a")
    /// * `date` - The calendar date the changes apply to
    ///
    /// # Returns
    /// * `Ok(Vec<ChangeRow>)` - Hydrated changes in application order;
    ///   empty when nothing changed that day
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_changes(
        &self,
        class_code: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ChangeRow>>;

    /// Append a change to the log and assign it the next sequence number.
    ///
    /// # Arguments
    /// * `change` - The change to record, without a sequence number
    ///
    /// # Returns
    /// * `Ok(Change)` - The stored change including its assigned sequence
    /// * `Err(RepositoryError::ValidationError)` - If the change is malformed
    /// * `Err(RepositoryError)` - If the operation fails
    async fn record_change(&self, change: NewChange) -> RepositoryResult<Change>;
}
