//! Public classroom portal and student progress

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use circle_common::{
    db::models::{Attendance, Classroom, DayOfWeek, Notice, TimetableEntry},
    db::{Repository, StudentGradeRow},
    domain::{grading::grade_average, AttendanceSummary},
    errors::{AppError, Result},
    metrics::record_student_login,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::today;
use crate::middleware::{AppJson, ClientAddr, StudentSession};
use crate::AppState;

/// Classroom fields safe to show without signing in
#[derive(Debug, Serialize)]
pub struct PublicClassroom {
    pub name: String,
    pub username: String,
    pub grade_level: String,
    pub academic_year: String,
    pub teacher_name: String,
}

impl From<Classroom> for PublicClassroom {
    fn from(c: Classroom) -> Self {
        Self {
            name: c.name,
            username: c.username,
            grade_level: c.grade_level,
            academic_year: c.academic_year,
            teacher_name: c.teacher_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PortalPage {
    Found {
        found: bool,
        classroom: PublicClassroom,
        date: NaiveDate,
        day: DayOfWeek,
        timetable: Vec<TimetableEntry>,
        notices: Vec<Notice>,
    },
    Missing {
        found: bool,
    },
}

#[derive(Debug, Deserialize)]
pub struct StudentLogin {
    #[serde(default)]
    pub login_id: String,
}

#[derive(Debug, Serialize)]
pub struct StudentLoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub student_name: String,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProgressReport {
    pub student: StudentSummary,
    pub classroom: PublicClassroom,
    pub grades: Vec<StudentGradeRow>,
    pub grade_average: f64,
    pub attendance: Vec<Attendance>,
    pub attendance_summary: AttendanceSummary,
}

/// Classroom landing page: today's periods and the notice board
pub async fn classroom_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PortalPage>> {
    let repo = Repository::new(state.db.clone());

    let Some(classroom) = repo.find_classroom_by_username(&username).await? else {
        return Ok(Json(PortalPage::Missing { found: false }));
    };

    let date = today();
    let day = DayOfWeek::from(date.weekday());
    let timetable = repo.timetable_for_day(classroom.id, day).await?;
    let notices = repo.list_notices(classroom.id).await?;

    Ok(Json(PortalPage::Found {
        found: true,
        classroom: classroom.into(),
        date,
        day,
        timetable,
        notices,
    }))
}

/// Exchange a login ID for a student session
pub async fn login(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ClientAddr(client): ClientAddr,
    AppJson(body): AppJson<StudentLogin>,
) -> Result<Json<StudentLoginResponse>> {
    let repo = Repository::new(state.db.clone());
    let Some(classroom) = repo.find_classroom_by_username(&username).await? else {
        record_student_login("invalid");
        return Err(AppError::InvalidLoginId);
    };

    state.login_limiter.check(&username, client)?;

    let login_id = body.login_id.trim();
    let student = if login_id.is_empty() {
        None
    } else {
        repo.find_student_by_login(classroom.id, login_id).await?
    };

    let Some(student) = student else {
        tracing::warn!(username = %username, client = %client, "Student login rejected");
        record_student_login("invalid");
        state.login_limiter.record_failure(&username, client)?;
        return Err(AppError::InvalidLoginId);
    };

    let name = student.full_name();
    let token = state
        .student_sessions
        .issue(student.id, student.classroom_id, &username, &name)?;

    record_student_login("success");
    tracing::info!(
        classroom_id = %student.classroom_id,
        student_id = %student.id,
        "Student signed in"
    );

    Ok(Json(StudentLoginResponse {
        token,
        expires_in: state.student_sessions.ttl_secs(),
        student_name: name,
        redirect: format!("/view/{}/progress", username),
    }))
}

/// Grades and attendance of the signed-in student
pub async fn progress(
    State(state): State<AppState>,
    session: StudentSession,
) -> Result<Json<ProgressReport>> {
    let repo = Repository::new(state.db.clone());
    let denied = || AppError::StudentSessionRequired {
        username: session.username.clone(),
    };

    let classroom = repo
        .find_classroom_by_username(&session.username)
        .await?
        .filter(|c| c.id == session.claims.classroom_id)
        .ok_or_else(denied)?;

    let student = repo
        .get_student(classroom.id, session.claims.sub)
        .await
        .map_err(|e| match e {
            AppError::StudentNotFound { .. } => denied(),
            other => other,
        })?;

    let grades = repo.student_grades(classroom.id, student.id).await?;
    let percentages: Vec<f64> = grades.iter().map(|g| g.percentage).collect();
    let attendance = repo.student_attendance(classroom.id, student.id).await?;
    let attendance_summary = AttendanceSummary::from_statuses(attendance.iter().map(|a| a.status));

    Ok(Json(ProgressReport {
        student: StudentSummary {
            id: student.id,
            name: student.full_name(),
            student_id: student.student_id,
        },
        classroom: classroom.into(),
        grade_average: grade_average(&percentages),
        grades,
        attendance,
        attendance_summary,
    }))
}
