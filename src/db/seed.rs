//! Demo data seeding.
//!
//! Populates a repository with a small realistic dataset for local
//! development: the full class list, the subject and teacher reference
//! tables, the standard bell timetable and a sample lesson grid for a few
//! classes. Seeding goes through the repository traits, so it works
//! against any backend, and every write is an upsert, so it is safe to
//! run more than once.

use tracing::info;

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{BaseLesson, BellTimetable, SchoolClass, Subject, SubjectId, Teacher, TeacherId};

// Subject IDs in the demo reference table
const MATH: i64 = 1;
const RUSSIAN: i64 = 2;
const PHYSICS: i64 = 4;
const HISTORY: i64 = 7;
const ENGLISH: i64 = 10;

/// Counts of the rows written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub classes: usize,
    pub subjects: usize,
    pub teachers: usize,
    pub lessons: usize,
}

/// Seed the demo dataset into `repo`.
///
/// # Returns
/// * `Ok(SeedSummary)` - Row counts per table
/// * `Err(RepositoryError)` - If any write fails
pub async fn seed_demo_data(repo: &dyn FullRepository) -> RepositoryResult<SeedSummary> {
    let classes = repo.insert_classes(&demo_classes()).await?;
    info!(count = classes, "seeded classes");

    let subjects = repo.insert_subjects(&demo_subjects()).await?;
    info!(count = subjects, "seeded subjects");

    let teachers = repo.insert_teachers(&demo_teachers()).await?;
    info!(count = teachers, "seeded teachers");

    repo.store_bell_timetable(&BellTimetable::standard()).await?;
    info!("seeded bell timetable");

    let lessons = repo.insert_base_lessons(&demo_lessons()).await?;
    info!(count = lessons, "seeded base lessons");

    Ok(SeedSummary {
        classes,
        subjects,
        teachers,
        lessons,
    })
}

fn class(code: &str, grade: u8, letter: &str, title: &str) -> SchoolClass {
    SchoolClass {
        code: code.to_string(),
        grade,
        letter: letter.to_string(),
        title: title.to_string(),
    }
}

fn demo_classes() -> Vec<SchoolClass> {
    vec![
        class("5a", 5, "а", "5А"),
        class("5b", 5, "б", "5Б"),
        class("5v", 5, "в", "5В"),
        class("6a", 6, "а", "6А"),
        class("6b", 6, "б", "6Б"),
        class("6v", 6, "в", "6В"),
        class("7a", 7, "а", "7А"),
        class("7b", 7, "б", "7Б"),
        class("7v", 7, "в", "7В"),
        class("8a", 8, "а", "8А"),
        class("8b", 8, "б", "8Б"),
        class("8v", 8, "в", "8В"),
        class("9a", 9, "а", "9А"),
        class("9b", 9, "б", "9Б"),
        class("9v", 9, "в", "9В"),
        class("10a", 10, "а", "10А"),
        class("10b", 10, "б", "10Б"),
        class("11a", 11, "а", "11А"),
    ]
}

fn subject(id: i64, name: &str, short: &str) -> Subject {
    Subject {
        id: SubjectId::new(id),
        name: name.to_string(),
        short: Some(short.to_string()),
    }
}

fn demo_subjects() -> Vec<Subject> {
    vec![
        subject(MATH, "Математика", "Матем."),
        subject(RUSSIAN, "Русский язык", "Русский"),
        subject(3, "Литература", "Лит-ра"),
        subject(PHYSICS, "Физика", "Физика"),
        subject(5, "Химия", "Химия"),
        subject(6, "Биология", "Биология"),
        subject(HISTORY, "История", "История"),
        subject(8, "Обществознание", "Общест."),
        subject(9, "География", "География"),
        subject(ENGLISH, "Английский язык", "Англ."),
        subject(11, "Физическая культура", "Физ-ра"),
        subject(12, "Информатика", "Информ."),
        subject(13, "ОБЖ", "ОБЖ"),
        subject(14, "Искусство", "Искусство"),
        subject(15, "Технология", "Техн."),
    ]
}

fn teacher(id: i64, full_name: &str, short_name: &str) -> Teacher {
    let code = format!("teacher{:03}", id);
    Teacher {
        id: TeacherId::new(id),
        code: code.clone(),
        full_name: full_name.to_string(),
        short_name: short_name.to_string(),
        ext_id: Some(code),
    }
}

fn demo_teachers() -> Vec<Teacher> {
    vec![
        teacher(1, "Иванова Ирина Александровна", "Иванова И.А."),
        teacher(2, "Петров Петр Петрович", "Петров П.П."),
        teacher(3, "Сидорова Анна Викторовна", "Сидорова А.В."),
        teacher(4, "Козлов Михаил Сергеевич", "Козлов М.С."),
        teacher(5, "Морозова Елена Дмитриевна", "Морозова Е.Д."),
        teacher(6, "Волков Александр Николаевич", "Волков А.Н."),
        teacher(7, "Лебедева Татьяна Ивановна", "Лебедева Т.И."),
        teacher(8, "Новиков Дмитрий Александрович", "Новиков Д.А."),
    ]
}

fn lesson(class: &str, weekday: u8, num: u8, subject: i64, teacher: i64, room: &str) -> BaseLesson {
    BaseLesson {
        class_code: class.to_string(),
        weekday,
        num,
        subject_id: Some(SubjectId::new(subject)),
        teacher_id: Some(TeacherId::new(teacher)),
        subgroup: None,
        room: Some(room.to_string()),
    }
}

fn split_lesson(
    class: &str,
    weekday: u8,
    num: u8,
    subject: i64,
    teacher: i64,
    room: &str,
    subgroup: &str,
) -> BaseLesson {
    BaseLesson {
        subgroup: Some(subgroup.to_string()),
        ..lesson(class, weekday, num, subject, teacher, room)
    }
}

fn demo_lessons() -> Vec<BaseLesson> {
    vec![
        // Monday (weekday 1)
        lesson("7a", 1, 1, MATH, 1, "301"),
        lesson("7a", 1, 2, RUSSIAN, 2, "205"),
        split_lesson("7a", 1, 3, PHYSICS, 3, "401", "гум"),
        split_lesson("7a", 1, 3, ENGLISH, 4, "208", "техн"),
        lesson("7a", 1, 4, HISTORY, 5, "302"),
        // Tuesday (weekday 2)
        lesson("7a", 2, 1, PHYSICS, 3, "401"),
        lesson("7a", 2, 2, MATH, 1, "301"),
        lesson("7a", 2, 3, ENGLISH, 4, "208"),
        lesson("7a", 2, 4, RUSSIAN, 2, "205"),
        // Wednesday (weekday 3)
        lesson("7a", 3, 1, MATH, 1, "301"),
        lesson("7a", 3, 2, HISTORY, 5, "302"),
        lesson("7a", 3, 3, PHYSICS, 3, "401"),
        // Other classes
        lesson("8a", 1, 1, RUSSIAN, 2, "206"),
        lesson("8a", 1, 2, MATH, 1, "302"),
        lesson("9a", 1, 1, PHYSICS, 3, "402"),
    ]
}
