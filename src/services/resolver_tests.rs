//! Tests for day schedule resolution against an in-memory repository.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::repositories::LocalRepository;
use crate::db::repository::*;
use crate::db::seed::seed_demo_data;
use crate::models::*;
use crate::services::resolver::resolve_day;

/// 2025-09-01 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 7).unwrap()
}

async fn seeded() -> LocalRepository {
    let repo = LocalRepository::new();
    seed_demo_data(&repo).await.unwrap();
    repo
}

fn part_subjects(lesson: &ResolvedLesson) -> Vec<Option<&str>> {
    lesson.parts.iter().map(|p| p.subject.as_deref()).collect()
}

#[tokio::test]
async fn test_base_day_without_changes() {
    let repo = seeded().await;
    let day = resolve_day(&repo, "7a", monday()).await.unwrap();

    assert_eq!(day.weekday, 1);
    assert!(day.is_school_day);
    assert_eq!(day.bell_table, "Стандарт");

    // Five base rows collapse into four periods (period 3 is split)
    let nums: Vec<u8> = day.lessons.iter().map(|l| l.num).collect();
    assert_eq!(nums, vec![1, 2, 3, 4]);

    let third = &day.lessons[2];
    assert_eq!(third.parts.len(), 2);
    assert_eq!(third.parts[0].subgroup.as_deref(), Some("гум"));
    assert_eq!(third.parts[0].subject.as_deref(), Some("Физика"));
    assert_eq!(third.parts[1].subgroup.as_deref(), Some("техн"));
    assert_eq!(third.parts[1].subject.as_deref(), Some("Английский язык"));

    // Bell-table times
    assert_eq!(day.lessons[0].time_start.to_string(), "08:30");
    assert_eq!(day.lessons[0].time_end.to_string(), "09:10");
    assert_eq!(third.time_start.to_string(), "10:10");
}

#[tokio::test]
async fn test_sunday_is_empty() {
    let repo = seeded().await;
    let day = resolve_day(&repo, "7a", sunday()).await.unwrap();

    assert_eq!(day.weekday, 7);
    assert!(!day.is_school_day);
    assert!(day.lessons.is_empty());
}

#[tokio::test]
async fn test_unknown_class_resolves_empty() {
    let repo = seeded().await;
    let day = resolve_day(&repo, "zz", monday()).await.unwrap();
    assert!(day.lessons.is_empty());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let repo = seeded().await;
    repo.record_change(NewChange::new(monday(), "7a", 1, None, ChangeKind::Cancel))
        .await
        .unwrap();

    let first = resolve_day(&repo, "7a", monday()).await.unwrap();
    let second = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(first.lessons, second.lessons);
}

#[tokio::test]
async fn test_cancel_removes_whole_period() {
    let repo = seeded().await;
    repo.record_change(NewChange::new(monday(), "7a", 1, None, ChangeKind::Cancel))
        .await
        .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let nums: Vec<u8> = day.lessons.iter().map(|l| l.num).collect();
    assert_eq!(nums, vec![2, 3, 4]);

    // The split period keeps both parts
    let third = day.lessons.iter().find(|l| l.num == 3).unwrap();
    assert_eq!(third.parts.len(), 2);
}

#[tokio::test]
async fn test_cancel_removes_only_targeted_subgroup() {
    let repo = seeded().await;
    repo.record_change(NewChange::new(
        monday(),
        "7a",
        3,
        Some("гум".to_string()),
        ChangeKind::Cancel,
    ))
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let third = day.lessons.iter().find(|l| l.num == 3).unwrap();
    assert_eq!(third.parts.len(), 1);
    assert_eq!(third.parts[0].subgroup.as_deref(), Some("техн"));
    assert_eq!(third.parts[0].subject.as_deref(), Some("Английский язык"));
}

#[tokio::test]
async fn test_cancel_of_absent_period_is_a_no_op() {
    let repo = seeded().await;
    repo.record_change(NewChange::new(monday(), "7a", 9, None, ChangeKind::Cancel))
        .await
        .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(day.lessons.len(), 4);
}

#[tokio::test]
async fn test_replace_swaps_subject_and_inherits_room() {
    let repo = seeded().await;
    // Period 1: Математика -> История, no room in the change
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(7)),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let first = &day.lessons[0];
    assert_eq!(first.parts[0].subject.as_deref(), Some("История"));
    // Unset fields inherit from the base part
    assert_eq!(first.parts[0].teacher.as_deref(), Some("Иванова И.А."));
    assert_eq!(first.parts[0].room.as_deref(), Some("301"));
}

#[tokio::test]
async fn test_teacher_change_keeps_subject_and_room() {
    let repo = seeded().await;
    // Period 2: Петров П.П. replaced by Новиков Д.А.
    repo.record_change(
        NewChange::new(monday(), "7a", 2, None, ChangeKind::Teacher)
            .with_teacher(TeacherId::new(8)),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let second = day.lessons.iter().find(|l| l.num == 2).unwrap();
    assert_eq!(second.parts[0].subject.as_deref(), Some("Русский язык"));
    assert_eq!(second.parts[0].teacher.as_deref(), Some("Новиков Д.А."));
    assert_eq!(second.parts[0].room.as_deref(), Some("205"));
}

#[tokio::test]
async fn test_replace_creates_period_missing_from_base() {
    let repo = seeded().await;
    // No base lesson at period 6 on Monday
    repo.record_change(
        NewChange::new(monday(), "7a", 6, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(11))
            .with_room("спортзал"),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let sixth = day.lessons.iter().find(|l| l.num == 6).unwrap();
    assert_eq!(sixth.parts[0].subject.as_deref(), Some("Физическая культура"));
    assert_eq!(sixth.parts[0].teacher, None);
    assert_eq!(sixth.parts[0].room.as_deref(), Some("спортзал"));
    // Times come from the bell table
    assert_eq!(sixth.time_start.to_string(), "13:05");
    assert_eq!(sixth.time_end.to_string(), "13:45");
}

#[tokio::test]
async fn test_time_change_preserves_lesson_content() {
    let repo = seeded().await;
    // Period 2: Русский язык, Петров П.П., room 205, moved to 09:00-09:45
    repo.record_change(
        NewChange::new(monday(), "7a", 2, None, ChangeKind::Time).with_times(
            Some(LessonTime::new(9, 0).unwrap()),
            Some(LessonTime::new(9, 45).unwrap()),
        ),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let second = day.lessons.iter().find(|l| l.num == 2).unwrap();
    assert_eq!(second.time_start.to_string(), "09:00");
    assert_eq!(second.time_end.to_string(), "09:45");
    assert_eq!(second.parts[0].subject.as_deref(), Some("Русский язык"));
    assert_eq!(second.parts[0].teacher.as_deref(), Some("Петров П.П."));
    assert_eq!(second.parts[0].room.as_deref(), Some("205"));
}

#[tokio::test]
async fn test_partial_time_change_keeps_other_bound() {
    let repo = seeded().await;
    // Only the start moves; the bell-table end must survive
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Time)
            .with_times(Some(LessonTime::new(8, 40).unwrap()), None),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let first = &day.lessons[0];
    assert_eq!(first.time_start.to_string(), "08:40");
    assert_eq!(first.time_end.to_string(), "09:10");
}

#[tokio::test]
async fn test_time_change_on_absent_period_creates_placeholder() {
    let repo = seeded().await;
    repo.record_change(
        NewChange::new(monday(), "7a", 7, None, ChangeKind::Time).with_times(
            Some(LessonTime::new(14, 10).unwrap()),
            Some(LessonTime::new(14, 50).unwrap()),
        ),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let seventh = day.lessons.iter().find(|l| l.num == 7).unwrap();
    assert_eq!(seventh.time_start.to_string(), "14:10");
    // Placeholder part keeps the lesson renderable
    assert_eq!(seventh.parts.len(), 1);
    assert_eq!(seventh.parts[0], LessonPart::default());
}

#[tokio::test]
async fn test_later_change_wins_on_same_slot() {
    let repo = seeded().await;
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(4)),
    )
    .await
    .unwrap();
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(7)),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(day.lessons[0].parts[0].subject.as_deref(), Some("История"));
}

#[tokio::test]
async fn test_cancel_then_replace_restores_period() {
    let repo = seeded().await;
    repo.record_change(NewChange::new(monday(), "7a", 4, None, ChangeKind::Cancel))
        .await
        .unwrap();
    repo.record_change(
        NewChange::new(monday(), "7a", 4, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(5)),
    )
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    let fourth = day.lessons.iter().find(|l| l.num == 4).unwrap();
    assert_eq!(part_subjects(fourth), vec![Some("Химия")]);
    // The cancelled base part is gone; nothing to inherit from
    assert_eq!(fourth.parts[0].teacher, None);
}

#[tokio::test]
async fn test_missing_bell_table_falls_back_to_standard() {
    // Hand-built repository without a stored bell timetable
    let repo = LocalRepository::new();
    repo.insert_subjects(&[Subject {
        id: SubjectId::new(1),
        name: "Математика".to_string(),
        short: None,
    }])
    .await
    .unwrap();
    repo.insert_base_lessons(&[BaseLesson {
        class_code: "7a".to_string(),
        weekday: 1,
        num: 1,
        subject_id: Some(SubjectId::new(1)),
        teacher_id: None,
        subgroup: None,
        room: None,
    }])
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(day.bell_table, "Стандарт");
    assert_eq!(day.lessons[0].time_start.to_string(), "08:30");
}

#[tokio::test]
async fn test_period_missing_from_bell_table_gets_midnight() {
    let repo = LocalRepository::new();
    repo.store_bell_timetable(&BellTimetable {
        name: "Стандарт".to_string(),
        periods: vec![BellPeriod {
            num: 1,
            time_start: LessonTime::new(8, 30).unwrap(),
            time_end: LessonTime::new(9, 10).unwrap(),
        }],
    })
    .await
    .unwrap();
    repo.insert_base_lessons(&[BaseLesson {
        class_code: "7a".to_string(),
        weekday: 1,
        num: 5,
        subject_id: None,
        teacher_id: None,
        subgroup: None,
        room: None,
    }])
    .await
    .unwrap();

    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(day.lessons[0].time_start.to_string(), "00:00");
    assert_eq!(day.lessons[0].time_end.to_string(), "00:00");
}

#[tokio::test]
async fn test_etag_carries_class_code() {
    let repo = seeded().await;
    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert!(day.etag.starts_with("W/\"7a-"));
    assert!(day.etag.ends_with('"'));
}

// ==================== Storage-order independence ====================

/// Delegating repository that returns changes in reverse order, to prove
/// resolution depends on sequence numbers, not storage iteration order.
struct ReversedChanges(LocalRepository);

#[async_trait]
impl TimetableRepository for ReversedChanges {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.0.health_check().await
    }

    async fn fetch_base_lessons(
        &self,
        class_code: &str,
        weekday: u8,
    ) -> RepositoryResult<Vec<TimetableRow>> {
        self.0.fetch_base_lessons(class_code, weekday).await
    }

    async fn insert_base_lessons(&self, lessons: &[BaseLesson]) -> RepositoryResult<usize> {
        self.0.insert_base_lessons(lessons).await
    }
}

#[async_trait]
impl ChangeLogRepository for ReversedChanges {
    async fn fetch_changes(
        &self,
        class_code: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<ChangeRow>> {
        let mut rows = self.0.fetch_changes(class_code, date).await?;
        rows.reverse();
        Ok(rows)
    }

    async fn record_change(&self, change: NewChange) -> RepositoryResult<Change> {
        self.0.record_change(change).await
    }
}

#[async_trait]
impl BellScheduleRepository for ReversedChanges {
    async fn fetch_bell_timetable(&self, name: &str) -> RepositoryResult<Option<BellTimetable>> {
        self.0.fetch_bell_timetable(name).await
    }

    async fn store_bell_timetable(&self, timetable: &BellTimetable) -> RepositoryResult<()> {
        self.0.store_bell_timetable(timetable).await
    }
}

#[async_trait]
impl ReferenceRepository for ReversedChanges {
    async fn list_classes(&self) -> RepositoryResult<Vec<SchoolClass>> {
        self.0.list_classes().await
    }

    async fn insert_classes(&self, classes: &[SchoolClass]) -> RepositoryResult<usize> {
        self.0.insert_classes(classes).await
    }

    async fn insert_subjects(&self, subjects: &[Subject]) -> RepositoryResult<usize> {
        self.0.insert_subjects(subjects).await
    }

    async fn insert_teachers(&self, teachers: &[Teacher]) -> RepositoryResult<usize> {
        self.0.insert_teachers(teachers).await
    }
}

#[tokio::test]
async fn test_conflict_resolution_ignores_storage_order() {
    let repo = ReversedChanges(seeded().await);
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(4)),
    )
    .await
    .unwrap();
    repo.record_change(
        NewChange::new(monday(), "7a", 1, None, ChangeKind::Replace)
            .with_subject(SubjectId::new(7)),
    )
    .await
    .unwrap();

    // fetch_changes returns the higher-seq change first; the resolver
    // must still let it win.
    let day = resolve_day(&repo, "7a", monday()).await.unwrap();
    assert_eq!(day.lessons[0].parts[0].subject.as_deref(), Some("История"));
}
