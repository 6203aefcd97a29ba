//! Day schedule resolution.
//!
//! The resolver turns the stored data for one (class, date) pair into a
//! renderable [`DaySchedule`]: it reads the base weekly grid for the date's
//! weekday, the dated change log, and the bell timetable, then merges them.
//!
//! The merge works on a map keyed by (period, subgroup). Base lessons seed
//! the map as one-part slots with bell-table times; changes are applied on
//! top in ascending sequence order, so when two changes touch the same slot
//! the most recently recorded one wins. Finally the per-subgroup slots are
//! grouped into one lesson per period.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::future;
use tokio::time::timeout;
use tracing::debug;

use super::grouping::{group_slots, LessonSlot};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    is_school_day, weak_etag, weekday_number, BellTimetable, ChangeKind, ChangeRow, DaySchedule,
    LessonPart, LessonTime, SubgroupKey, TimetableRow, DEFAULT_BELL_TABLE_NAME,
};

/// Upper bound on the combined storage reads for one resolution.
const STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

type SlotKey = (u8, SubgroupKey);

/// Merge-map entry: one (period, subgroup) slot carrying at most one part.
/// A part-less slot can only come from a time change with no underlying
/// lesson; it renders as a placeholder part.
struct Slot {
    time_start: LessonTime,
    time_end: LessonTime,
    part: Option<LessonPart>,
}

/// Resolve the schedule for one class on one calendar date.
///
/// The three storage reads are independent and run concurrently under a
/// single timeout. Storage errors propagate unchanged; the resolver adds
/// no recoverable states of its own.
pub async fn resolve_day(
    repo: &dyn FullRepository,
    class_code: &str,
    date: NaiveDate,
) -> RepositoryResult<DaySchedule> {
    let weekday = weekday_number(date);

    let reads = future::try_join3(
        repo.fetch_base_lessons(class_code, weekday),
        repo.fetch_changes(class_code, date),
        repo.fetch_bell_timetable(DEFAULT_BELL_TABLE_NAME),
    );
    let (rows, mut changes, bells) = timeout(STORAGE_TIMEOUT, reads).await.map_err(|_| {
        RepositoryError::timeout(format!(
            "storage reads exceeded {}s for class {} on {}",
            STORAGE_TIMEOUT.as_secs(),
            class_code,
            date
        ))
    })??;
    let bells = bells.unwrap_or_default();

    let mut slots: BTreeMap<SlotKey, Slot> = BTreeMap::new();
    for row in &rows {
        let key = (row.num, SubgroupKey::from_option(row.subgroup.as_deref()));
        let (time_start, time_end) = bells.times_for(row.num);
        slots.insert(
            key,
            Slot {
                time_start,
                time_end,
                part: Some(base_part(row)),
            },
        );
    }

    // Repositories return changes in sequence order already; sorting here
    // keeps the last-writer-wins guarantee independent of the backend.
    changes.sort_by_key(|c| c.seq);
    let change_count = changes.len();
    for change in changes {
        apply_change(&mut slots, &bells, change);
    }

    let lessons = group_slots(slots.into_iter().map(|((num, subgroup), slot)| LessonSlot {
        num,
        subgroup,
        time_start: slot.time_start,
        time_end: slot.time_end,
        part: slot.part.unwrap_or_default(),
    }));

    debug!(
        class = class_code,
        %date,
        changes = change_count,
        lessons = lessons.len(),
        "resolved day schedule"
    );

    let now = Utc::now();
    Ok(DaySchedule {
        date,
        class_code: class_code.to_string(),
        weekday,
        is_school_day: is_school_day(date),
        lessons,
        bell_table: bells.name,
        last_updated: now,
        etag: weak_etag(class_code, now),
    })
}

fn base_part(row: &TimetableRow) -> LessonPart {
    LessonPart {
        subject: row.subject.as_ref().map(|s| s.name.clone()),
        subject_short: row.subject.as_ref().and_then(|s| s.short.clone()),
        teacher: row.teacher.as_ref().map(|t| t.short_name.clone()),
        subgroup: row.subgroup.clone(),
        room: row.room.clone(),
    }
}

fn apply_change(slots: &mut BTreeMap<SlotKey, Slot>, bells: &BellTimetable, change: ChangeRow) {
    let key = (
        change.num,
        SubgroupKey::from_option(change.subgroup.as_deref()),
    );

    match change.kind {
        ChangeKind::Cancel => {
            // Removes only this subgroup's slot; other subgroups of the
            // same period survive.
            slots.remove(&key);
        }
        ChangeKind::Replace | ChangeKind::Teacher => {
            let existing = slots.get(&key).and_then(|s| s.part.as_ref());

            // Fields the change leaves unset inherit from the existing part
            let (subject, subject_short) = match &change.subject {
                Some(s) => (Some(s.name.clone()), s.short.clone()),
                None => (
                    existing.and_then(|p| p.subject.clone()),
                    existing.and_then(|p| p.subject_short.clone()),
                ),
            };
            let teacher = change
                .teacher
                .as_ref()
                .map(|t| t.short_name.clone())
                .or_else(|| existing.and_then(|p| p.teacher.clone()));
            let room = change
                .room
                .clone()
                .or_else(|| existing.and_then(|p| p.room.clone()));

            let part = LessonPart {
                subject,
                subject_short,
                teacher,
                subgroup: key.1.as_option().map(str::to_string),
                room,
            };

            let (time_start, time_end) = match slots.get(&key) {
                Some(slot) => (slot.time_start, slot.time_end),
                None => bells.times_for(key.0),
            };
            slots.insert(
                key,
                Slot {
                    time_start,
                    time_end,
                    part: Some(part),
                },
            );
        }
        ChangeKind::Time => {
            let entry = slots.entry(key).or_insert_with_key(|k| {
                let (time_start, time_end) = bells.times_for(k.0);
                Slot {
                    time_start,
                    time_end,
                    part: None,
                }
            });
            // Only the supplied fields move; an end-only change keeps the
            // existing start and vice versa.
            if let Some(start) = change.time_start {
                entry.time_start = start;
            }
            if let Some(end) = change.time_end {
                entry.time_end = end;
            }
        }
    }
}
