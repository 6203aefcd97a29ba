//! Period grouping shared by server resolution and client normalization.
//!
//! A resolved day is built from per-subgroup slots: one entry per
//! (period, subgroup) pair. Rendering wants one lesson per period with an
//! ordered list of subgroup parts. This module holds the single grouping
//! implementation both sides use, so their fallback behavior cannot drift
//! apart.

use std::collections::HashMap;

use crate::models::{LessonPart, LessonTime, ResolvedLesson, SubgroupKey};

/// One (period, subgroup) slot ready for grouping.
#[derive(Debug, Clone)]
pub struct LessonSlot {
    pub num: u8,
    pub subgroup: SubgroupKey,
    pub time_start: LessonTime,
    pub time_end: LessonTime,
    pub part: LessonPart,
}

/// Group slots into one lesson per period number.
///
/// Parts keep their slot-encounter order within a period, and the first
/// encountered slot's times become the period's times. The returned lessons
/// are sorted by period number ascending. Every lesson has at least one
/// part because every slot carries one.
pub fn group_slots(slots: impl IntoIterator<Item = LessonSlot>) -> Vec<ResolvedLesson> {
    let mut lessons: Vec<ResolvedLesson> = Vec::new();
    let mut by_num: HashMap<u8, usize> = HashMap::new();

    for slot in slots {
        match by_num.get(&slot.num) {
            Some(&idx) => lessons[idx].parts.push(slot.part),
            None => {
                by_num.insert(slot.num, lessons.len());
                lessons.push(ResolvedLesson {
                    num: slot.num,
                    time_start: slot.time_start,
                    time_end: slot.time_end,
                    parts: vec![slot.part],
                });
            }
        }
    }

    lessons.sort_by_key(|l| l.num);
    lessons
}
