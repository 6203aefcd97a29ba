//! Bell timetable repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::BellTimetable;

/// Repository trait for named bell timetables (period start/end times).
#[async_trait]
pub trait BellScheduleRepository: Send + Sync {
    /// Fetch a named bell timetable.
    ///
    /// # Returns
    /// * `Ok(Some(BellTimetable))` - The stored timetable
    /// * `Ok(None)` - If no timetable with that name exists
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_bell_timetable(&self, name: &str) -> RepositoryResult<Option<BellTimetable>>;

    /// Store a bell timetable, replacing any existing one with the same name.
    async fn store_bell_timetable(&self, timetable: &BellTimetable) -> RepositoryResult<()>;
}
