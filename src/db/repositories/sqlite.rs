//! Embedded SQLite repository implementation.
//!
//! Persistent single-node backend using a bundled SQLite database. All
//! traits are implemented over a single connection behind a mutex; queries
//! are short and index-backed, so the lock is held only briefly.
//!
//! Reference records are joined into lesson and change rows on read, the
//! same hydrated shape the in-memory backend produces. Bell timetables are
//! stored as a JSON column keyed by name.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;

use crate::db::repository::*;
use crate::models::{
    BaseLesson, BellPeriod, BellTimetable, Change, ChangeKind, ChangeRow, LessonTime, NewChange,
    SchoolClass, Subject, SubjectId, Teacher, TeacherId, TimetableRow,
};

/// SQLite-backed repository.
pub struct SqliteRepository {
    connection: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) a database at `path` and initialize the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let connection = Connection::open(path).map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("open").with_entity("sqlite"),
            )
        })?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Open an in-memory database. Each instance is isolated.
    pub fn open_in_memory() -> RepositoryResult<Self> {
        let connection = Connection::open_in_memory().map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("open_in_memory").with_entity("sqlite"),
            )
        })?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> RepositoryResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS classes (
                code   TEXT PRIMARY KEY,
                grade  INTEGER NOT NULL,
                letter TEXT NOT NULL,
                title  TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS subjects (
                id    INTEGER PRIMARY KEY,
                name  TEXT NOT NULL,
                short TEXT
            );
            CREATE TABLE IF NOT EXISTS teachers (
                id         INTEGER PRIMARY KEY,
                code       TEXT NOT NULL,
                full_name  TEXT NOT NULL,
                short_name TEXT NOT NULL,
                ext_id     TEXT
            );
            CREATE TABLE IF NOT EXISTS lessons (
                class_code TEXT NOT NULL,
                weekday    INTEGER NOT NULL,
                num        INTEGER NOT NULL,
                subgroup   TEXT NOT NULL DEFAULT '',
                subject_id INTEGER,
                teacher_id INTEGER,
                room       TEXT,
                PRIMARY KEY (class_code, weekday, num, subgroup)
            );
            CREATE TABLE IF NOT EXISTS changes (
                seq        INTEGER PRIMARY KEY AUTOINCREMENT,
                date       TEXT NOT NULL,
                class_code TEXT NOT NULL,
                num        INTEGER NOT NULL,
                subgroup   TEXT,
                kind       TEXT NOT NULL,
                subject_id INTEGER,
                teacher_id INTEGER,
                room       TEXT,
                time_start TEXT,
                time_end   TEXT,
                note       TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_changes_class_date
                ON changes (class_code, date);
            CREATE TABLE IF NOT EXISTS bell_tables (
                name         TEXT PRIMARY KEY,
                periods_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

/// Read the optional joined subject columns starting at `idx`.
fn subject_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Subject>> {
    let id: Option<i64> = row.get(idx)?;
    Ok(match id {
        Some(id) => Some(Subject {
            id: SubjectId::new(id),
            name: row.get(idx + 1)?,
            short: row.get(idx + 2)?,
        }),
        None => None,
    })
}

/// Read the optional joined teacher columns starting at `idx`.
fn teacher_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Teacher>> {
    let id: Option<i64> = row.get(idx)?;
    Ok(match id {
        Some(id) => Some(Teacher {
            id: TeacherId::new(id),
            code: row.get(idx + 1)?,
            full_name: row.get(idx + 2)?,
            short_name: row.get(idx + 3)?,
            ext_id: row.get(idx + 4)?,
        }),
        None => None,
    })
}

/// None subgroups are stored as '' so the lessons primary key stays unique.
fn subgroup_to_db(subgroup: &Option<String>) -> String {
    subgroup.clone().unwrap_or_default()
}

fn subgroup_from_db(raw: String) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

/// Change row as read from SQLite, before kind and time columns are parsed.
struct RawChange {
    seq: i64,
    num: u8,
    subgroup: Option<String>,
    kind: String,
    room: Option<String>,
    time_start: Option<String>,
    time_end: Option<String>,
    note: Option<String>,
    subject: Option<Subject>,
    teacher: Option<Teacher>,
}

impl RawChange {
    fn into_row(self) -> RepositoryResult<ChangeRow> {
        let kind = ChangeKind::from_str(&self.kind).map_err(|msg| {
            RepositoryError::internal(format!("corrupt change kind: {msg}"))
                .with_operation("fetch_changes")
        })?;
        let parse_time = |raw: Option<String>| -> RepositoryResult<Option<LessonTime>> {
            raw.map(|s| LessonTime::from_str(&s))
                .transpose()
                .map_err(|msg| {
                    RepositoryError::internal(format!("corrupt change time: {msg}"))
                        .with_operation("fetch_changes")
                })
        };
        Ok(ChangeRow {
            seq: self.seq,
            num: self.num,
            subgroup: self.subgroup,
            kind,
            subject: self.subject,
            teacher: self.teacher,
            room: self.room,
            time_start: parse_time(self.time_start)?,
            time_end: parse_time(self.time_end)?,
            note: self.note,
        })
    }
}

// ==================== Timetable Repository ====================

#[async_trait]
impl TimetableRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let conn = self.connection.lock();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn fetch_base_lessons(
        &self,
        class_code: &str,
        weekday: u8,
    ) -> RepositoryResult<Vec<TimetableRow>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT l.num, l.subgroup, l.room,
                    s.id, s.name, s.short,
                    t.id, t.code, t.full_name, t.short_name, t.ext_id
             FROM lessons l
             LEFT JOIN subjects s ON s.id = l.subject_id
             LEFT JOIN teachers t ON t.id = l.teacher_id
             WHERE l.class_code = ?1 AND l.weekday = ?2
             ORDER BY l.num ASC, l.subgroup ASC",
        )?;

        let rows = stmt.query_map(params![class_code, weekday], |row| {
            Ok(TimetableRow {
                num: row.get(0)?,
                subgroup: subgroup_from_db(row.get(1)?),
                room: row.get(2)?,
                subject: subject_from_row(row, 3)?,
                teacher: teacher_from_row(row, 6)?,
            })
        })?;

        let mut lessons = Vec::new();
        for row in rows {
            lessons.push(row?);
        }
        Ok(lessons)
    }

    async fn insert_base_lessons(&self, lessons: &[BaseLesson]) -> RepositoryResult<usize> {
        for lesson in lessons {
            lesson.validate().map_err(|msg| RepositoryError::ValidationError {
                message: msg,
                context: ErrorContext::new("insert_base_lessons").with_entity("lesson"),
            })?;
        }

        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO lessons
                     (class_code, weekday, num, subgroup, subject_id, teacher_id, room)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for lesson in lessons {
                stmt.execute(params![
                    lesson.class_code,
                    lesson.weekday,
                    lesson.num,
                    subgroup_to_db(&lesson.subgroup),
                    lesson.subject_id.map(|id| id.value()),
                    lesson.teacher_id.map(|id| id.value()),
                    lesson.room,
                ])?;
            }
        }
        tx.commit()?;
        Ok(lessons.len())
    }
}

// ==================== Change Log Repository ====================

#[async_trait]
impl ChangeLogRepository for SqliteRepository {
    async fn fetch_changes(
        &self,
        class_code: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ChangeRow>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT c.seq, c.num, c.subgroup, c.kind, c.room,
                    c.time_start, c.time_end, c.note,
                    s.id, s.name, s.short,
                    t.id, t.code, t.full_name, t.short_name, t.ext_id
             FROM changes c
             LEFT JOIN subjects s ON s.id = c.subject_id
             LEFT JOIN teachers t ON t.id = c.teacher_id
             WHERE c.class_code = ?1 AND c.date = ?2
             ORDER BY c.seq ASC",
        )?;

        let raw_rows = stmt.query_map(params![class_code, date.to_string()], |row| {
            Ok(RawChange {
                seq: row.get(0)?,
                num: row.get(1)?,
                subgroup: row.get(2)?,
                kind: row.get(3)?,
                room: row.get(4)?,
                time_start: row.get(5)?,
                time_end: row.get(6)?,
                note: row.get(7)?,
                subject: subject_from_row(row, 8)?,
                teacher: teacher_from_row(row, 11)?,
            })
        })?;

        let mut changes = Vec::new();
        for raw in raw_rows {
            changes.push(raw?.into_row()?);
        }
        Ok(changes)
    }

    async fn record_change(&self, change: NewChange) -> RepositoryResult<Change> {
        change.validate().map_err(|msg| RepositoryError::ValidationError {
            message: msg,
            context: ErrorContext::new("record_change").with_entity("change"),
        })?;

        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO changes
                 (date, class_code, num, subgroup, kind,
                  subject_id, teacher_id, room, time_start, time_end, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                change.date.to_string(),
                change.class_code,
                change.num,
                change.subgroup,
                change.kind.as_str(),
                change.subject_id.map(|id| id.value()),
                change.teacher_id.map(|id| id.value()),
                change.room,
                change.time_start.map(|t| t.to_string()),
                change.time_end.map(|t| t.to_string()),
                change.note,
            ],
        )?;

        let seq = conn.last_insert_rowid();
        Ok(change.into_change(seq))
    }
}

// ==================== Bell Schedule Repository ====================

#[async_trait]
impl BellScheduleRepository for SqliteRepository {
    async fn fetch_bell_timetable(&self, name: &str) -> RepositoryResult<Option<BellTimetable>> {
        let conn = self.connection.lock();
        let json: Option<String> = conn
            .query_row(
                "SELECT periods_json FROM bell_tables WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        let periods: Vec<BellPeriod> = serde_json::from_str(&json)?;
        Ok(Some(BellTimetable {
            name: name.to_string(),
            periods,
        }))
    }

    async fn store_bell_timetable(&self, timetable: &BellTimetable) -> RepositoryResult<()> {
        let json = serde_json::to_string(&timetable.periods)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT OR REPLACE INTO bell_tables (name, periods_json) VALUES (?1, ?2)",
            params![timetable.name, json],
        )?;
        Ok(())
    }
}

// ==================== Reference Repository ====================

#[async_trait]
impl ReferenceRepository for SqliteRepository {
    async fn list_classes(&self) -> RepositoryResult<Vec<SchoolClass>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT code, grade, letter, title FROM classes ORDER BY grade ASC, letter ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SchoolClass {
                code: row.get(0)?,
                grade: row.get(1)?,
                letter: row.get(2)?,
                title: row.get(3)?,
            })
        })?;

        let mut classes = Vec::new();
        for row in rows {
            classes.push(row?);
        }
        Ok(classes)
    }

    async fn insert_classes(&self, classes: &[SchoolClass]) -> RepositoryResult<usize> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO classes (code, grade, letter, title)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for class in classes {
                stmt.execute(params![class.code, class.grade, class.letter, class.title])?;
            }
        }
        tx.commit()?;
        Ok(classes.len())
    }

    async fn insert_subjects(&self, subjects: &[Subject]) -> RepositoryResult<usize> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO subjects (id, name, short) VALUES (?1, ?2, ?3)",
            )?;
            for subject in subjects {
                stmt.execute(params![subject.id.value(), subject.name, subject.short])?;
            }
        }
        tx.commit()?;
        Ok(subjects.len())
    }

    async fn insert_teachers(&self, teachers: &[Teacher]) -> RepositoryResult<usize> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO teachers (id, code, full_name, short_name, ext_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for teacher in teachers {
                stmt.execute(params![
                    teacher.id.value(),
                    teacher.code,
                    teacher.full_name,
                    teacher.short_name,
                    teacher.ext_id,
                ])?;
            }
        }
        tx.commit()?;
        Ok(teachers.len())
    }
}
