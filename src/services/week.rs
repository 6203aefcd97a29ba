//! Week schedule assembly.
//!
//! A school week is Monday through Saturday, always six entries. Each day
//! goes through the same per-day resolution as a single-day request, so
//! dated changes land in week views too.

use chrono::{Days, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::resolver::resolve_day;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{weak_etag, week_label, DaySchedule, WeekAnchor, WeekSchedule, SCHOOL_WEEK_DAYS};

/// How many day resolutions run against storage at once.
const DAY_CONCURRENCY: usize = 3;

/// Resolve the Monday..Saturday schedule for the week selected by `anchor`.
///
/// Days resolve concurrently (bounded by [`DAY_CONCURRENCY`]) and come back
/// in calendar order. Any day failing fails the whole week.
///
/// # Arguments
///
/// * `repo` - Storage backend
/// * `class_code` - Class code, e.g. "7a"
/// * `anchor` - A date inside the week, or an ISO week label
pub async fn resolve_week(
    repo: &dyn FullRepository,
    class_code: &str,
    anchor: &WeekAnchor,
) -> RepositoryResult<WeekSchedule> {
    let monday = anchor.monday().map_err(RepositoryError::validation)?;

    let days: Vec<DaySchedule> = stream::iter(0..SCHOOL_WEEK_DAYS as u64)
        .map(|offset| resolve_day(repo, class_code, monday + Days::new(offset)))
        .buffered(DAY_CONCURRENCY)
        .try_collect()
        .await?;

    let week = week_label(monday);
    debug!(class = class_code, week = %week, "resolved week schedule");

    let now = Utc::now();
    Ok(WeekSchedule {
        week,
        class_code: class_code.to_string(),
        days,
        last_updated: now,
        etag: weak_etag(class_code, now),
    })
}
