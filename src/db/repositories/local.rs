//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    BaseLesson, BellTimetable, Change, ChangeRow, NewChange, SchoolClass, SubgroupKey, Subject,
    Teacher, TimetableRow,
};

/// Natural key of a base lesson slot: (class, weekday, period, subgroup).
/// `None` subgroup is stored as an empty string so whole-class and subgroup
/// rows never collide.
type LessonKey = (String, u8, u8, String);

/// In-memory local repository.
///
/// This implementation stores all data in memory, making it ideal for unit
/// tests and local development that need isolation and speed. It also backs
/// the default server configuration when no database is configured.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.insert_base_lessons(&lessons).await?;
/// let rows = repo.fetch_base_lessons("7a", 1).await?;
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    classes: HashMap<String, SchoolClass>,
    subjects: HashMap<i64, Subject>,
    teachers: HashMap<i64, Teacher>,
    lessons: HashMap<LessonKey, BaseLesson>,
    changes: Vec<Change>,
    bell_tables: HashMap<String, BellTimetable>,

    // Sequence counter for the change log
    next_change_seq: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
            subjects: HashMap::new(),
            teachers: HashMap::new(),
            lessons: HashMap::new(),
            changes: Vec::new(),
            bell_tables: HashMap::new(),
            next_change_seq: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of base lesson rows stored.
    pub fn lesson_count(&self) -> usize {
        self.data.read().lessons.len()
    }

    /// Number of changes recorded.
    pub fn change_count(&self) -> usize {
        self.data.read().changes.len()
    }

    /// Helper to check health and return an error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Storage is not healthy"));
        }
        Ok(())
    }

    fn lesson_key(lesson: &BaseLesson) -> LessonKey {
        (
            lesson.class_code.clone(),
            lesson.weekday,
            lesson.num,
            lesson.subgroup.clone().unwrap_or_default(),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Hydrate one base lesson into a row with joined reference records.
/// Unknown subject or teacher IDs hydrate to `None` rather than erroring.
fn hydrate_lesson(data: &LocalData, lesson: &BaseLesson) -> TimetableRow {
    TimetableRow {
        num: lesson.num,
        subject: lesson
            .subject_id
            .and_then(|id| data.subjects.get(&id.value()).cloned()),
        teacher: lesson
            .teacher_id
            .and_then(|id| data.teachers.get(&id.value()).cloned()),
        subgroup: lesson.subgroup.clone(),
        room: lesson.room.clone(),
    }
}

fn hydrate_change(data: &LocalData, change: &Change) -> ChangeRow {
    ChangeRow {
        seq: change.seq,
        num: change.num,
        subgroup: change.subgroup.clone(),
        kind: change.kind,
        subject: change
            .subject_id
            .and_then(|id| data.subjects.get(&id.value()).cloned()),
        teacher: change
            .teacher_id
            .and_then(|id| data.teachers.get(&id.value()).cloned()),
        room: change.room.clone(),
        time_start: change.time_start,
        time_end: change.time_end,
        note: change.note.clone(),
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_base_lessons(
        &self,
        class_code: &str,
        weekday: u8,
    ) -> RepositoryResult<Vec<TimetableRow>> {
        self.check_health()?;
        let data = self.data.read();

        let mut rows: Vec<TimetableRow> = data
            .lessons
            .values()
            .filter(|l| l.class_code == class_code && l.weekday == weekday)
            .map(|l| hydrate_lesson(&data, l))
            .collect();

        // Stable order: period number, whole-class slots before subgroups
        rows.sort_by(|a, b| {
            (a.num, SubgroupKey::from_option(a.subgroup.as_deref()))
                .cmp(&(b.num, SubgroupKey::from_option(b.subgroup.as_deref())))
        });
        Ok(rows)
    }

    async fn insert_base_lessons(&self, lessons: &[BaseLesson]) -> RepositoryResult<usize> {
        self.check_health()?;
        for lesson in lessons {
            lesson.validate().map_err(|msg| {
                RepositoryError::ValidationError {
                    message: msg,
                    context: ErrorContext::new("insert_base_lessons").with_entity("lesson"),
                }
            })?;
        }

        let mut data = self.data.write();
        for lesson in lessons {
            data.lessons.insert(Self::lesson_key(lesson), lesson.clone());
        }
        Ok(lessons.len())
    }
}

#[async_trait]
impl ChangeLogRepository for LocalRepository {
    async fn fetch_changes(
        &self,
        class_code: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ChangeRow>> {
        self.check_health()?;
        let data = self.data.read();

        let mut rows: Vec<ChangeRow> = data
            .changes
            .iter()
            .filter(|c| c.class_code == class_code && c.date == date)
            .map(|c| hydrate_change(&data, c))
            .collect();

        rows.sort_by_key(|c| c.seq);
        Ok(rows)
    }

    async fn record_change(&self, change: NewChange) -> RepositoryResult<Change> {
        self.check_health()?;
        change.validate().map_err(|msg| RepositoryError::ValidationError {
            message: msg,
            context: ErrorContext::new("record_change").with_entity("change"),
        })?;

        let mut data = self.data.write();
        let seq = data.next_change_seq;
        data.next_change_seq += 1;

        let stored = change.into_change(seq);
        data.changes.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl BellScheduleRepository for LocalRepository {
    async fn fetch_bell_timetable(&self, name: &str) -> RepositoryResult<Option<BellTimetable>> {
        self.check_health()?;
        Ok(self.data.read().bell_tables.get(name).cloned())
    }

    async fn store_bell_timetable(&self, timetable: &BellTimetable) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .bell_tables
            .insert(timetable.name.clone(), timetable.clone());
        Ok(())
    }
}

#[async_trait]
impl ReferenceRepository for LocalRepository {
    async fn list_classes(&self) -> RepositoryResult<Vec<SchoolClass>> {
        self.check_health()?;
        let data = self.data.read();

        let mut classes: Vec<SchoolClass> = data.classes.values().cloned().collect();
        classes.sort_by(|a, b| (a.grade, &a.letter).cmp(&(b.grade, &b.letter)));
        Ok(classes)
    }

    async fn insert_classes(&self, classes: &[SchoolClass]) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        for class in classes {
            data.classes.insert(class.code.clone(), class.clone());
        }
        Ok(classes.len())
    }

    async fn insert_subjects(&self, subjects: &[Subject]) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        for subject in subjects {
            data.subjects.insert(subject.id.value(), subject.clone());
        }
        Ok(subjects.len())
    }

    async fn insert_teachers(&self, teachers: &[Teacher]) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        for teacher in teachers {
            data.teachers.insert(teacher.id.value(), teacher.clone());
        }
        Ok(teachers.len())
    }
}
