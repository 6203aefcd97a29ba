//! Derived schedule types produced by the resolver. Never persisted;
//! recomputed on every request.

use super::calendar::LessonTime;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One subgroup's slice of a period.
///
/// Unset fields render as placeholder literals at the wire boundary, not
/// inside the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPart {
    pub subject: Option<String>,
    pub subject_short: Option<String>,
    pub teacher: Option<String>,
    pub subgroup: Option<String>,
    pub room: Option<String>,
}

/// Final merged output for one period.
///
/// `parts` is never empty: a merge slot that carried no part data
/// contributes one all-unset part instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLesson {
    pub num: u8,
    pub time_start: LessonTime,
    pub time_end: LessonTime,
    pub parts: Vec<LessonPart>,
}

impl ResolvedLesson {
    /// Flat single-part view: the first (main) part.
    pub fn primary_part(&self) -> Option<&LessonPart> {
        self.parts.first()
    }
}

/// Resolved schedule for one class and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub class_code: String,
    /// ISO weekday, Monday=1 .. Sunday=7.
    pub weekday: u8,
    pub is_school_day: bool,
    pub lessons: Vec<ResolvedLesson>,
    /// Name of the bell timetable the times came from.
    pub bell_table: String,
    pub last_updated: DateTime<Utc>,
    pub etag: String,
}

/// Resolved Monday..Saturday week for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    /// ISO week label, e.g. "2025-W36".
    pub week: String,
    pub class_code: String,
    pub days: Vec<DaySchedule>,
    pub last_updated: DateTime<Utc>,
    pub etag: String,
}

/// Informational freshness token attached to responses. Not used for
/// conditional caching.
pub fn weak_etag(class_code: &str, at: DateTime<Utc>) -> String {
    format!("W/\"{}-{}\"", class_code, at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_primary_part_is_first() {
        let lesson = ResolvedLesson {
            num: 3,
            time_start: LessonTime::new(10, 10).unwrap(),
            time_end: LessonTime::new(10, 50).unwrap(),
            parts: vec![
                LessonPart {
                    subject: Some("Физика".to_string()),
                    subgroup: Some("гум".to_string()),
                    ..Default::default()
                },
                LessonPart {
                    subject: Some("Английский язык".to_string()),
                    subgroup: Some("техн".to_string()),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            lesson.primary_part().and_then(|p| p.subject.as_deref()),
            Some("Физика")
        );
    }

    #[test]
    fn test_weak_etag_format() {
        let at = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        let etag = weak_etag("7a", at);
        assert_eq!(etag, format!("W/\"7a-{}\"", at.timestamp_millis()));
        assert!(etag.starts_with("W/\"7a-"));
        assert!(etag.ends_with('"'));
    }
}
