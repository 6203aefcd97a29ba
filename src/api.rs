//! Public API surface for the schedule service.
//!
//! This file consolidates the wire-level DTO types for the HTTP API,
//! shared by the server handlers and the client adapter. All types derive
//! Serialize/Deserialize with camelCase field names matching the wire
//! contract.
//!
//! Placeholder literals are applied here, at the boundary: a missing
//! subject renders as "Предмет не указан" and a missing teacher/room as an
//! empty string. The client display layer turns an empty teacher into
//! "не указан".

use crate::models::{
    BellTimetable, DaySchedule, LessonPart, LessonTime, ResolvedLesson, SchoolClass, WeekSchedule,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Literal shown when a lesson part has no subject.
pub const SUBJECT_PLACEHOLDER: &str = "Предмет не указан";

/// Literal the client shows when a lesson part has no teacher.
pub const TEACHER_PLACEHOLDER: &str = "не указан";

/// One subgroup part of a lesson on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPartDto {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_short: Option<String>,
    #[serde(default)]
    pub teacher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,
    #[serde(default)]
    pub room: String,
}

impl LessonPartDto {
    pub fn from_part(part: &LessonPart) -> Self {
        Self {
            subject: part
                .subject
                .clone()
                .unwrap_or_else(|| SUBJECT_PLACEHOLDER.to_string()),
            subject_short: part.subject_short.clone(),
            teacher: part.teacher.clone().unwrap_or_default(),
            subgroup: part.subgroup.clone(),
            room: part.room.clone().unwrap_or_default(),
        }
    }

    pub fn into_part(self) -> LessonPart {
        LessonPart {
            subject: Some(self.subject).filter(|s| !s.is_empty()),
            subject_short: self.subject_short,
            teacher: Some(self.teacher).filter(|s| !s.is_empty()),
            subgroup: self.subgroup,
            room: Some(self.room).filter(|s| !s.is_empty()),
        }
    }

    /// Teacher name for display; empty wire values render as the
    /// placeholder literal.
    pub fn teacher_display(&self) -> &str {
        if self.teacher.is_empty() {
            TEACHER_PLACEHOLDER
        } else {
            &self.teacher
        }
    }
}

/// One period-grouped lesson on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub num: u8,
    pub time_start: LessonTime,
    pub time_end: LessonTime,
    pub parts: Vec<LessonPartDto>,
}

impl From<&ResolvedLesson> for LessonDto {
    fn from(lesson: &ResolvedLesson) -> Self {
        Self {
            num: lesson.num,
            time_start: lesson.time_start,
            time_end: lesson.time_end,
            parts: lesson.parts.iter().map(LessonPartDto::from_part).collect(),
        }
    }
}

/// Name of the bell timetable a schedule was rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellScheduleInfo {
    pub name: String,
}

/// `GET /schedule` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub date: NaiveDate,
    pub class_id: String,
    pub weekday: u8,
    pub is_school_day: bool,
    pub lessons: Vec<LessonDto>,
    pub bell_schedule: BellScheduleInfo,
    pub last_updated: DateTime<Utc>,
    pub etag: String,
}

impl From<&DaySchedule> for ScheduleResponse {
    fn from(schedule: &DaySchedule) -> Self {
        Self {
            date: schedule.date,
            class_id: schedule.class_code.clone(),
            weekday: schedule.weekday,
            is_school_day: schedule.is_school_day,
            lessons: schedule.lessons.iter().map(LessonDto::from).collect(),
            bell_schedule: BellScheduleInfo {
                name: schedule.bell_table.clone(),
            },
            last_updated: schedule.last_updated,
            etag: schedule.etag.clone(),
        }
    }
}

/// One day inside a `GET /schedule/week` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDayDto {
    pub date: NaiveDate,
    pub weekday: u8,
    pub is_school_day: bool,
    pub lessons: Vec<LessonDto>,
}

/// `GET /schedule/week` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekScheduleResponse {
    /// ISO week label, e.g. "2025-W36".
    pub week: String,
    pub class_id: String,
    pub days: Vec<WeekDayDto>,
    pub last_updated: DateTime<Utc>,
    pub etag: String,
}

impl From<&WeekSchedule> for WeekScheduleResponse {
    fn from(week: &WeekSchedule) -> Self {
        Self {
            week: week.week.clone(),
            class_id: week.class_code.clone(),
            days: week
                .days
                .iter()
                .map(|day| WeekDayDto {
                    date: day.date,
                    weekday: day.weekday,
                    is_school_day: day.is_school_day,
                    lessons: day.lessons.iter().map(LessonDto::from).collect(),
                })
                .collect(),
            last_updated: week.last_updated,
            etag: week.etag.clone(),
        }
    }
}

/// One class in the `GET /classes` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDto {
    /// Class code used as the `classId` query value.
    pub id: String,
    pub title: String,
}

impl From<&SchoolClass> for ClassDto {
    fn from(class: &SchoolClass) -> Self {
        Self {
            id: class.code.clone(),
            title: class.title.clone(),
        }
    }
}

/// `GET /classes` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<ClassDto>,
}

/// `GET /bells` response: the active bell timetable.
pub type BellsResponse = BellTimetable;

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started.
    pub uptime: f64,
    pub database: String,
}

/// Endpoint inventory in the `GET /` service info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointIndex {
    pub schedule: String,
    pub week: String,
    pub classes: String,
    pub bells: String,
    pub health: String,
}

/// `GET /` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointIndex,
    pub database: String,
}

/// JSON error body. `path`/`method` are set on 404 fallbacks, `message`
/// on internal errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            path: None,
            method: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_request(mut self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self.method = Some(method.into());
        self
    }
}
