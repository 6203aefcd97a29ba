//! Durable reference entities and override records.

use super::calendar::LessonTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest period number a timetable entry may use.
pub const MAX_PERIOD_NUM: u8 = 12;

/// Subject identifier (storage primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub i64);

/// Teacher identifier (storage primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeacherId(pub i64);

impl SubjectId {
    pub fn new(value: i64) -> Self {
        SubjectId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TeacherId {
    pub fn new(value: i64) -> Self {
        TeacherId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// School class reference entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    /// Stable code used in URLs and storage keys (e.g. "7a").
    pub code: String,
    pub grade: u8,
    /// Cyrillic class letter (e.g. "а").
    pub letter: String,
    /// Display title (e.g. "7А").
    pub title: String,
}

/// Subject reference entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Abbreviated name for dense layouts (e.g. "Матем.").
    pub short: Option<String>,
}

/// Teacher reference entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub code: String,
    pub full_name: String,
    /// Family name with initials (e.g. "Иванова И.А."), used on schedules.
    pub short_name: String,
    pub ext_id: Option<String>,
}

/// One recurring weekly-timetable entry.
///
/// At most one entry exists per (class_code, weekday, num, subgroup);
/// parallel subgroup parts of the same period carry distinct subgroup tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLesson {
    pub class_code: String,
    /// ISO weekday, Monday=1 .. Sunday=7.
    pub weekday: u8,
    /// Period number, 1..=12.
    pub num: u8,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    pub subgroup: Option<String>,
    pub room: Option<String>,
}

impl BaseLesson {
    pub fn validate(&self) -> Result<(), String> {
        if self.class_code.is_empty() {
            return Err("Lesson class code must not be empty".to_string());
        }
        if !(1..=7).contains(&self.weekday) {
            return Err(format!("Lesson weekday out of range 1..=7: {}", self.weekday));
        }
        if !(1..=MAX_PERIOD_NUM).contains(&self.num) {
            return Err(format!(
                "Lesson period out of range 1..={MAX_PERIOD_NUM}: {}",
                self.num
            ));
        }
        Ok(())
    }
}

/// Kind of a date-scoped override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Remove the targeted part; the period survives if other subgroup
    /// parts remain.
    Cancel,
    /// Substitute subject/teacher/room; unset fields keep prior values.
    Replace,
    /// Teacher swap only; same fallback rules as Replace.
    Teacher,
    /// Shift start/end times; lesson content untouched.
    Time,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Cancel => "cancel",
            ChangeKind::Replace => "replace",
            ChangeKind::Teacher => "teacher",
            ChangeKind::Time => "time",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(ChangeKind::Cancel),
            "replace" => Ok(ChangeKind::Replace),
            "teacher" => Ok(ChangeKind::Teacher),
            "time" => Ok(ChangeKind::Time),
            other => Err(format!("Unknown change kind: {other}")),
        }
    }
}

/// A recorded date-scoped override.
///
/// `seq` is assigned by storage in record order; when two changes target
/// the same merge key, the one with the higher `seq` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub seq: i64,
    pub date: NaiveDate,
    pub class_code: String,
    pub num: u8,
    pub subgroup: Option<String>,
    pub kind: ChangeKind,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    pub room: Option<String>,
    pub time_start: Option<LessonTime>,
    pub time_end: Option<LessonTime>,
    pub note: Option<String>,
}

/// A change as submitted by administrative data entry, before storage
/// assigns its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChange {
    pub date: NaiveDate,
    pub class_code: String,
    pub num: u8,
    pub subgroup: Option<String>,
    pub kind: ChangeKind,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    pub room: Option<String>,
    pub time_start: Option<LessonTime>,
    pub time_end: Option<LessonTime>,
    pub note: Option<String>,
}

impl NewChange {
    pub fn new(
        date: NaiveDate,
        class_code: impl Into<String>,
        num: u8,
        subgroup: Option<String>,
        kind: ChangeKind,
    ) -> Self {
        Self {
            date,
            class_code: class_code.into(),
            num,
            subgroup,
            kind,
            subject_id: None,
            teacher_id: None,
            room: None,
            time_start: None,
            time_end: None,
            note: None,
        }
    }

    pub fn with_subject(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_teacher(mut self, teacher_id: TeacherId) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_times(mut self, time_start: Option<LessonTime>, time_end: Option<LessonTime>) -> Self {
        self.time_start = time_start;
        self.time_end = time_end;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.class_code.is_empty() {
            return Err("Change class code must not be empty".to_string());
        }
        if !(1..=MAX_PERIOD_NUM).contains(&self.num) {
            return Err(format!(
                "Change period out of range 1..={MAX_PERIOD_NUM}: {}",
                self.num
            ));
        }
        Ok(())
    }

    pub fn into_change(self, seq: i64) -> Change {
        Change {
            seq,
            date: self.date,
            class_code: self.class_code,
            num: self.num,
            subgroup: self.subgroup,
            kind: self.kind,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            room: self.room,
            time_start: self.time_start,
            time_end: self.time_end,
            note: self.note,
        }
    }
}

/// Subgroup component of a merge key: the unlabeled whole-class bucket or
/// a named tag.
///
/// `Main` orders before any named tag, so a mixed period lists its
/// whole-class part first and named subgroup parts after, in tag order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubgroupKey {
    Main,
    Named(String),
}

impl SubgroupKey {
    pub fn from_option(subgroup: Option<&str>) -> Self {
        match subgroup {
            Some(tag) if !tag.is_empty() => SubgroupKey::Named(tag.to_string()),
            _ => SubgroupKey::Main,
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            SubgroupKey::Main => None,
            SubgroupKey::Named(tag) => Some(tag),
        }
    }
}

/// Base lesson with its subject/teacher references resolved, as returned
/// by the timetable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRow {
    pub num: u8,
    pub subject: Option<Subject>,
    pub teacher: Option<Teacher>,
    pub subgroup: Option<String>,
    pub room: Option<String>,
}

/// Change with its references resolved, as returned by the change log
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRow {
    pub seq: i64,
    pub num: u8,
    pub subgroup: Option<String>,
    pub kind: ChangeKind,
    pub subject: Option<Subject>,
    pub teacher: Option<Teacher>,
    pub room: Option<String>,
    pub time_start: Option<LessonTime>,
    pub time_end: Option<LessonTime>,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_subgroup_key_from_option() {
        assert_eq!(SubgroupKey::from_option(None), SubgroupKey::Main);
        assert_eq!(SubgroupKey::from_option(Some("")), SubgroupKey::Main);
        assert_eq!(
            SubgroupKey::from_option(Some("гум")),
            SubgroupKey::Named("гум".to_string())
        );
    }

    #[test]
    fn test_subgroup_key_main_orders_first() {
        let mut keys = vec![
            SubgroupKey::Named("техн".to_string()),
            SubgroupKey::Main,
            SubgroupKey::Named("гум".to_string()),
        ];
        keys.sort();
        assert_eq!(keys[0], SubgroupKey::Main);
        assert_eq!(keys[1], SubgroupKey::Named("гум".to_string()));
        assert_eq!(keys[2], SubgroupKey::Named("техн".to_string()));
    }

    #[test]
    fn test_subgroup_key_as_option_round_trip() {
        let named = SubgroupKey::from_option(Some("гум"));
        assert_eq!(named.as_option(), Some("гум"));
        assert_eq!(SubgroupKey::Main.as_option(), None);
    }

    #[test]
    fn test_change_kind_string_round_trip() {
        for kind in [
            ChangeKind::Cancel,
            ChangeKind::Replace,
            ChangeKind::Teacher,
            ChangeKind::Time,
        ] {
            assert_eq!(kind.as_str().parse::<ChangeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_change_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::Cancel).unwrap(),
            "\"cancel\""
        );
        let kind: ChangeKind = serde_json::from_str("\"time\"").unwrap();
        assert_eq!(kind, ChangeKind::Time);
    }

    #[test]
    fn test_change_kind_rejects_unknown() {
        assert!("postpone".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn test_base_lesson_validate() {
        let lesson = BaseLesson {
            class_code: "7a".to_string(),
            weekday: 1,
            num: 3,
            subject_id: Some(SubjectId::new(1)),
            teacher_id: None,
            subgroup: Some("гум".to_string()),
            room: Some("401".to_string()),
        };
        assert!(lesson.validate().is_ok());

        let bad_weekday = BaseLesson { weekday: 8, ..lesson.clone() };
        assert!(bad_weekday.validate().is_err());

        let bad_period = BaseLesson { num: 13, ..lesson.clone() };
        assert!(bad_period.validate().is_err());

        let no_class = BaseLesson {
            class_code: String::new(),
            ..lesson
        };
        assert!(no_class.validate().is_err());
    }

    #[test]
    fn test_new_change_builder_and_into_change() {
        let change = NewChange::new(date(2025, 9, 1), "7a", 2, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(4))
            .with_room("109")
            .with_note("замена");

        assert!(change.validate().is_ok());
        let recorded = change.into_change(17);
        assert_eq!(recorded.seq, 17);
        assert_eq!(recorded.class_code, "7a");
        assert_eq!(recorded.subject_id, Some(SubjectId::new(4)));
        assert_eq!(recorded.room.as_deref(), Some("109"));
        assert_eq!(recorded.note.as_deref(), Some("замена"));
    }

    #[test]
    fn test_new_change_validate_period_bounds() {
        let change = NewChange::new(date(2025, 9, 1), "7a", 0, None, ChangeKind::Cancel);
        assert!(change.validate().is_err());
    }
}
