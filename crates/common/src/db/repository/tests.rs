use super::*;
use crate::db::schema;
use crate::domain::admin::SchoolInput;
use crate::domain::{AssignmentInput, AttendanceSheet, ClassroomSetup, StudentInput, TimetableEntryInput};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DbBackend, PaginatorTrait, Statement};
use serde_json::json;

async fn setup() -> (DbPool, Repository) {
    let pool = DbPool::connect_url("sqlite::memory:", 1).await.unwrap();
    schema::bootstrap(pool.write()).await.unwrap();
    (pool.clone(), Repository::new(pool))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn classroom_form(name: &str, username: &str) -> ClassroomSetup {
    serde_json::from_value(json!({
        "name": name,
        "username": username,
        "gradeLevel": "5",
        "academicYear": "2024-2025",
        "teacherName": "A. Smith",
    }))
    .unwrap()
}

async fn classroom(repo: &Repository, username: &str) -> (Uuid, Classroom) {
    let teacher_id = Uuid::new_v4();
    repo.ensure_profile(teacher_id, &format!("{}@school.test", username))
        .await
        .unwrap();
    let classroom = repo
        .create_classroom(teacher_id, &classroom_form("Grade 5", username), username)
        .await
        .unwrap();
    (teacher_id, classroom)
}

fn student_form(first: &str, last: &str) -> StudentInput {
    serde_json::from_value(json!({
        "first_name": first,
        "last_name": last,
        "date_of_birth": "2015-01-01",
        "parent_name": format!("B. {}", last),
        "parent_phone": "555-0001",
    }))
    .unwrap()
}

fn quiz(total_marks: f64) -> AssignmentInput {
    serde_json::from_value(json!({
        "title": "Quiz 1",
        "subject": "Math",
        "total_marks": total_marks,
        "exam_date": "2025-03-01",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_setup_links_profile_to_classroom() {
    let (_, repo) = setup().await;
    let (teacher_id, classroom) = classroom(&repo, "grade5").await;

    assert_eq!(classroom.username, "grade5");
    assert_eq!(classroom.name, "Grade 5");

    let profile = repo.find_profile(teacher_id).await.unwrap().unwrap();
    assert_eq!(profile.classroom_id, Some(classroom.id));
    assert_eq!(profile.full_name.as_deref(), Some("A. Smith"));
    assert_eq!(profile.role, Role::Teacher);
}

#[tokio::test]
async fn test_taken_username_is_rejected_without_writing() {
    let (pool, repo) = setup().await;
    let (_, original) = classroom(&repo, "grade5").await;

    let other_teacher = Uuid::new_v4();
    repo.ensure_profile(other_teacher, "other@school.test").await.unwrap();
    let err = repo
        .create_classroom(other_teacher, &classroom_form("Another", "grade5"), "grade5")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Duplicate { ref message } if message == USERNAME_TAKEN));
    assert_eq!(ClassroomEntity::find().count(pool.read()).await.unwrap(), 1);

    let unchanged = repo.find_classroom_by_username("grade5").await.unwrap().unwrap();
    assert_eq!(unchanged.id, original.id);
    assert_eq!(unchanged.name, "Grade 5");

    let profile = repo.find_profile(other_teacher).await.unwrap().unwrap();
    assert_eq!(profile.classroom_id, None);
}

#[tokio::test]
async fn test_teacher_cannot_own_two_classrooms() {
    let (_, repo) = setup().await;
    let (teacher_id, _) = classroom(&repo, "grade5").await;

    let err = repo
        .create_classroom(teacher_id, &classroom_form("Second", "second"), "second")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Duplicate { .. }));
    assert!(repo.find_classroom_by_username("second").await.unwrap().is_none());
}

#[tokio::test]
async fn test_ensure_profile_is_idempotent() {
    let (pool, repo) = setup().await;
    let id = Uuid::new_v4();

    let first = repo.ensure_profile(id, "t@school.test").await.unwrap();
    let second = repo.ensure_profile(id, "t@school.test").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(ProfileEntity::find().count(pool.read()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_created_students_get_distinct_login_ids() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;

    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let ben = repo.create_student(&classroom, student_form("Ben", "Lee")).await.unwrap();

    assert!(amy.login_id.starts_with("AMYLEE"));
    assert_eq!(amy.login_id.len(), 10);
    assert_ne!(amy.login_id, ben.login_id);
    assert_eq!(amy.parent_guardian_name, "B. Lee");
    assert_eq!(amy.teacher_id, classroom.teacher_id);

    let roster = repo.list_students(classroom.id).await.unwrap();
    let names: Vec<_> = roster.iter().map(|s| s.first_name.as_str()).collect();
    assert_eq!(names, vec!["Amy", "Ben"]);
}

#[tokio::test]
async fn test_roster_is_scoped_to_classroom() {
    let (_, repo) = setup().await;
    let (_, a) = classroom(&repo, "classa").await;
    let (_, b) = classroom(&repo, "classb").await;

    let amy = repo.create_student(&a, student_form("Amy", "Lee")).await.unwrap();
    repo.create_student(&b, student_form("Zed", "Ray")).await.unwrap();

    let roster_b = repo.list_students(b.id).await.unwrap();
    assert_eq!(roster_b.len(), 1);
    assert!(roster_b.iter().all(|s| s.classroom_id == b.id));

    let err = repo.get_student(b.id, amy.id).await.unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound { .. }));

    let err = repo.delete_student(b.id, amy.id).await.unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound { .. }));
    assert!(repo.get_student(a.id, amy.id).await.is_ok());
}

#[tokio::test]
async fn test_student_login_ignores_case() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();

    let found = repo
        .find_student_by_login(classroom.id, &amy.login_id.to_lowercase())
        .await
        .unwrap();
    assert_eq!(found.map(|s| s.id), Some(amy.id));

    let missing = repo.find_student_by_login(classroom.id, "WRONG00000").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_attendance_save_round_trip_and_idempotence() {
    let (pool, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let ben = repo.create_student(&classroom, student_form("Ben", "Ng")).await.unwrap();
    let day = date(2025, 3, 1);

    let mut sheet = AttendanceSheet::new();
    sheet.toggle(amy.id, AttendanceStatus::Present);
    sheet.toggle(ben.id, AttendanceStatus::Late);

    repo.save_attendance(classroom.id, day, &sheet).await.unwrap();
    repo.save_attendance(classroom.id, day, &sheet).await.unwrap();

    let loaded = repo.load_attendance(classroom.id, day).await.unwrap();
    assert_eq!(loaded, sheet);
    assert_eq!(AttendanceEntity::find().count(pool.read()).await.unwrap(), 2);

    // Ben unmarked, Amy switched to absent
    let mut edited = loaded.clone();
    edited.toggle(ben.id, AttendanceStatus::Late);
    edited.toggle(amy.id, AttendanceStatus::Absent);
    repo.save_attendance(classroom.id, day, &edited).await.unwrap();

    let reloaded = repo.load_attendance(classroom.id, day).await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.status_of(&amy.id), Some(AttendanceStatus::Absent));
    assert_eq!(reloaded.status_of(&ben.id), None);

    repo.save_attendance(classroom.id, day, &AttendanceSheet::new()).await.unwrap();
    assert!(repo.load_attendance(classroom.id, day).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attendance_rejects_foreign_students() {
    let (pool, repo) = setup().await;
    let (_, a) = classroom(&repo, "classa").await;
    let (_, b) = classroom(&repo, "classb").await;
    let amy = repo.create_student(&a, student_form("Amy", "Lee")).await.unwrap();
    let zed = repo.create_student(&b, student_form("Zed", "Ray")).await.unwrap();

    let mut sheet = AttendanceSheet::new();
    sheet.toggle(amy.id, AttendanceStatus::Present);
    sheet.toggle(zed.id, AttendanceStatus::Present);

    let err = repo.save_attendance(a.id, date(2025, 3, 1), &sheet).await.unwrap_err();
    assert!(matches!(err, AppError::ClassroomMismatch));
    assert_eq!(AttendanceEntity::find().count(pool.read()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_student_attendance_history_is_newest_first() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();

    for (day, status) in [
        (date(2025, 3, 1), AttendanceStatus::Present),
        (date(2025, 3, 3), AttendanceStatus::Absent),
        (date(2025, 3, 2), AttendanceStatus::Late),
    ] {
        let mut sheet = AttendanceSheet::new();
        sheet.toggle(amy.id, status);
        repo.save_attendance(classroom.id, day, &sheet).await.unwrap();
    }

    let history = repo.student_attendance(classroom.id, amy.id).await.unwrap();
    let dates: Vec<_> = history.iter().map(|a| a.date).collect();
    assert_eq!(dates, vec![date(2025, 3, 3), date(2025, 3, 2), date(2025, 3, 1)]);
}

#[tokio::test]
async fn test_grade_percentage_is_computed_from_assignment() {
    let (pool, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let ben = repo.create_student(&classroom, student_form("Ben", "Ng")).await.unwrap();

    let assignment = repo
        .create_assignment(classroom.id, quiz(100.0).resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();
    assert_eq!(assignment.pass_marks, 40.0);

    let grades = repo
        .save_grades(classroom.id, assignment.id, &HashMap::from([(amy.id, 85.0), (ben.id, 30.0)]))
        .await
        .unwrap();
    assert_eq!(grades.len(), 2);

    let amy_grade = grades.iter().find(|g| g.student_id == amy.id).unwrap();
    assert_eq!(amy_grade.percentage, 85.0);
    assert_eq!(amy_grade.student_name, "Amy Lee");

    // Resave drops Ben and rewrites Amy
    repo.save_grades(classroom.id, assignment.id, &HashMap::from([(amy.id, 92.5)]))
        .await
        .unwrap();

    let (_, rows) = repo.list_grades(classroom.id, assignment.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].grade.marks_obtained, 92.5);
    assert_eq!(rows[0].band.as_deref(), Some("A+"));
    assert_eq!(GradeEntity::find().count(pool.read()).await.unwrap(), 1);

    for grade in GradeEntity::find().all(pool.read()).await.unwrap() {
        assert_eq!(grade.percentage, grade.marks_obtained / assignment.total_marks * 100.0);
    }
}

#[tokio::test]
async fn test_grade_save_rejects_bad_marks_and_foreign_students() {
    let (pool, repo) = setup().await;
    let (_, a) = classroom(&repo, "classa").await;
    let (_, b) = classroom(&repo, "classb").await;
    let amy = repo.create_student(&a, student_form("Amy", "Lee")).await.unwrap();
    let zed = repo.create_student(&b, student_form("Zed", "Ray")).await.unwrap();
    let assignment = repo
        .create_assignment(a.id, quiz(50.0).resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();

    let err = repo
        .save_grades(a.id, assignment.id, &HashMap::from([(amy.id, -1.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let err = repo
        .save_grades(a.id, assignment.id, &HashMap::from([(amy.id, f64::NAN)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let err = repo
        .save_grades(a.id, assignment.id, &HashMap::from([(amy.id, 10.0), (zed.id, 10.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ClassroomMismatch));

    let err = repo
        .save_grades(b.id, assignment.id, &HashMap::from([(zed.id, 10.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AssignmentNotFound { .. }));

    assert_eq!(GradeEntity::find().count(pool.read()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_student_removes_grades_and_attendance() {
    let (pool, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let assignment = repo
        .create_assignment(classroom.id, quiz(20.0).resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();

    repo.save_grades(classroom.id, assignment.id, &HashMap::from([(amy.id, 15.0)]))
        .await
        .unwrap();
    let mut sheet = AttendanceSheet::new();
    sheet.toggle(amy.id, AttendanceStatus::Present);
    repo.save_attendance(classroom.id, date(2025, 3, 1), &sheet).await.unwrap();

    repo.delete_student(classroom.id, amy.id).await.unwrap();

    assert_eq!(StudentEntity::find().count(pool.read()).await.unwrap(), 0);
    assert_eq!(GradeEntity::find().count(pool.read()).await.unwrap(), 0);
    assert_eq!(AttendanceEntity::find().count(pool.read()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_assignment_removes_grades() {
    let (pool, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let assignment = repo
        .create_assignment(classroom.id, quiz(20.0).resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();
    repo.save_grades(classroom.id, assignment.id, &HashMap::from([(amy.id, 15.0)]))
        .await
        .unwrap();

    repo.delete_assignment(classroom.id, assignment.id).await.unwrap();

    assert_eq!(repo.count_assignments(classroom.id).await.unwrap(), 0);
    assert_eq!(GradeEntity::find().count(pool.read()).await.unwrap(), 0);
    assert!(repo.get_student(classroom.id, amy.id).await.is_ok());
}

#[tokio::test]
async fn test_classroom_owned_tables_cascade_from_classrooms() {
    let (pool, _) = setup().await;

    for table in ["attendance", "grades", "students", "assignments", "notices", "timetable"] {
        let rows = pool
            .read()
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                format!("PRAGMA foreign_key_list({})", table),
            ))
            .await
            .unwrap();

        let cascades = rows.iter().any(|row| {
            row.try_get::<String>("", "table").unwrap() == "classrooms"
                && row.try_get::<String>("", "on_delete").unwrap() == "CASCADE"
        });
        assert!(cascades, "{} has no cascading classroom key", table);
    }
}

#[tokio::test]
async fn test_student_progress_report() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();

    let early = repo
        .create_assignment(classroom.id, quiz(50.0).resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();
    let mut later = quiz(10.0);
    later.title = "Quiz 2".to_string();
    later.exam_date = Some(date(2025, 4, 1));
    let later = repo
        .create_assignment(classroom.id, later.resolve(date(2025, 3, 1)).unwrap())
        .await
        .unwrap();

    repo.save_grades(classroom.id, early.id, &HashMap::from([(amy.id, 15.0)])).await.unwrap();
    repo.save_grades(classroom.id, later.id, &HashMap::from([(amy.id, 8.0)])).await.unwrap();

    let report = repo.student_grades(classroom.id, amy.id).await.unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].title, "Quiz 2");
    assert_eq!(report[0].band.as_deref(), Some("A"));
    assert!(report[0].passed);
    assert_eq!(report[1].percentage, 30.0);
    assert_eq!(report[1].band.as_deref(), Some("F"));
    assert!(!report[1].passed);
}

#[tokio::test]
async fn test_dashboard_overview_counts() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let ben = repo.create_student(&classroom, student_form("Ben", "Ng")).await.unwrap();
    let cat = repo.create_student(&classroom, student_form("Cat", "Oz")).await.unwrap();
    let today = date(2025, 3, 1);

    let mut sheet = AttendanceSheet::new();
    sheet.toggle(amy.id, AttendanceStatus::Present);
    sheet.toggle(ben.id, AttendanceStatus::Present);
    sheet.toggle(cat.id, AttendanceStatus::Late);
    repo.save_attendance(classroom.id, today, &sheet).await.unwrap();
    repo.create_assignment(classroom.id, quiz(10.0).resolve(today).unwrap())
        .await
        .unwrap();

    let overview = repo.dashboard_overview(classroom.id, today).await.unwrap();
    assert_eq!(overview.total_students, 3);
    assert_eq!(overview.present_today, 2);
    assert_eq!(overview.total_assignments, 1);
    assert_eq!(overview.attendance_rate, 67);
}

#[tokio::test]
async fn test_timetable_replace_orders_by_day_and_time() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;

    let period = |day: DayOfWeek, start: u32, subject: &str| TimetableEntryInput {
        day_of_week: day,
        start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(start + 1, 0, 0).unwrap(),
        subject: subject.to_string(),
        teacher_name: "A. Smith".to_string(),
    };

    repo.replace_timetable(classroom.id, vec![period(DayOfWeek::Monday, 9, "Old")])
        .await
        .unwrap();
    let saved = repo
        .replace_timetable(
            classroom.id,
            vec![
                period(DayOfWeek::Wednesday, 9, "Art"),
                period(DayOfWeek::Monday, 11, "Science"),
                period(DayOfWeek::Monday, 9, "Math"),
            ],
        )
        .await
        .unwrap();

    let subjects: Vec<_> = saved.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Math", "Science", "Art"]);

    let week = repo.list_timetable(classroom.id).await.unwrap();
    assert_eq!(week.len(), 3);

    let monday = repo.timetable_for_day(classroom.id, DayOfWeek::Monday).await.unwrap();
    let subjects: Vec<_> = monday.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Math", "Science"]);
}

#[tokio::test]
async fn test_notices_are_scoped_and_newest_first() {
    let (_, repo) = setup().await;
    let (_, a) = classroom(&repo, "classa").await;
    let (_, b) = classroom(&repo, "classb").await;
    let today = date(2025, 3, 5);

    let notice = |title: &str, date: Option<&str>| -> crate::domain::NoticeInput {
        serde_json::from_value(json!({ "title": title, "content": "Bring crayons", "date": date }))
            .unwrap()
    };

    repo.create_notice(a.id, notice("Older", Some("2025-03-01")), today).await.unwrap();
    let latest = repo.create_notice(a.id, notice("Today", None), today).await.unwrap();
    assert_eq!(latest.date, today);

    let notices = repo.list_notices(a.id).await.unwrap();
    let titles: Vec<_> = notices.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Today", "Older"]);
    assert!(repo.list_notices(b.id).await.unwrap().is_empty());

    let err = repo.delete_notice(b.id, latest.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    repo.delete_notice(a.id, latest.id).await.unwrap();
    assert_eq!(repo.list_notices(a.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_role_change_writes_audit_row() {
    let (_, repo) = setup().await;
    let admin = Uuid::new_v4();
    let user = Uuid::new_v4();
    repo.ensure_profile(admin, "admin@school.test").await.unwrap();
    repo.ensure_profile(user, "user@school.test").await.unwrap();

    let updated = repo.change_role(admin, user, Role::SchoolAdmin).await.unwrap();
    assert_eq!(updated.role, Role::SchoolAdmin);

    let trail = repo.audit_trail("user", &user.to_string()).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "role_changed");
    assert_eq!(trail[0].user_id, admin);
    assert_eq!(trail[0].details, json!({ "old_role": "teacher", "new_role": "school_admin" }));

    let err = repo.change_role(admin, Uuid::new_v4(), Role::Staff).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_school_defaults_and_status_change() {
    let (_, repo) = setup().await;
    let input: SchoolInput = serde_json::from_value(json!({
        "name": "Hillside",
        "admin_email": "head@hillside.test",
    }))
    .unwrap();

    let school = repo.create_school(input).await.unwrap();
    assert_eq!(school.status, SchoolStatus::Active);
    assert_eq!(school.billing_email, "head@hillside.test");
    assert_eq!(school.subscription_tier, SubscriptionTier::Free);

    let suspended = repo.update_school_status(school.id, SchoolStatus::Suspended).await.unwrap();
    assert_eq!(suspended.status, SchoolStatus::Suspended);
    let reactivated = repo.update_school_status(school.id, SchoolStatus::Active).await.unwrap();
    assert_eq!(reactivated.status, SchoolStatus::Active);
}

#[tokio::test]
async fn test_api_key_lifecycle() {
    let (_, repo) = setup().await;

    let key = repo.create_api_key("Reporting").await.unwrap();
    assert!(key.api_key.starts_with("sk_"));
    assert!(key.is_active);

    let revoked = repo.revoke_api_key(key.id).await.unwrap();
    assert!(!revoked.is_active);
    assert_eq!(repo.list_api_keys().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_overview() {
    let (_, repo) = setup().await;
    let (_, classroom) = classroom(&repo, "grade5").await;
    let amy = repo.create_student(&classroom, student_form("Amy", "Lee")).await.unwrap();
    let today = date(2025, 3, 1);

    let mut sheet = AttendanceSheet::new();
    sheet.toggle(amy.id, AttendanceStatus::Present);
    repo.save_attendance(classroom.id, today, &sheet).await.unwrap();

    let school: SchoolInput = serde_json::from_value(json!({
        "name": "Hillside",
        "admin_email": "head@hillside.test",
        "subscription_tier": "premium",
    }))
    .unwrap();
    repo.create_school(school).await.unwrap();

    let overview = repo.admin_overview(today).await.unwrap();
    assert_eq!(overview.total_schools, 1);
    assert_eq!(overview.active_schools, 1);
    assert_eq!(overview.total_students, 1);
    assert_eq!(overview.total_teachers, 1);
    assert_eq!(overview.attendance_rate, 100);
    assert_eq!(overview.health, crate::domain::PlatformHealth::Healthy);
    assert_eq!(overview.schools_by_tier.len(), 1);
    assert_eq!(overview.schools_by_tier[0].tier, SubscriptionTier::Premium);
}
