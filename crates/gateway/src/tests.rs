use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use circle_common::{
    ai::{ExtractedGrades, MockLanguageModel},
    billing::MockBillingPortal,
    db::{models::Role, Repository},
    identity::MockIdentityProvider,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// PNG signature, enough for the mark sheet sniffer
const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    async fn with_config(config: AppConfig) -> Self {
        let db = DbPool::connect_url("sqlite::memory:", 1).await.unwrap();
        schema::bootstrap(db.write()).await.unwrap();

        let extraction: ExtractedGrades = serde_json::from_value(json!({
            "grades": [
                { "studentName": "ada lovelace", "marks": 18 },
                { "studentName": "Grace Hopper", "marks": 12 },
            ],
            "subject": "Math",
        }))
        .unwrap();
        let model = MockLanguageModel::new()
            .with_analysis("Most students passed.")
            .with_extraction(extraction);

        let identity = MockIdentityProvider::new(JwtManager::new(
            &config.auth.identity_jwt_secret,
            IDENTITY_TOKEN_TTL_SECS,
        ));

        let state = AppState::new(
            config,
            db,
            Arc::new(model),
            Arc::new(MockBillingPortal),
            Arc::new(identity),
        );

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn token_for(&self, user_id: Uuid) -> String {
        self.state
            .identity_tokens
            .generate_token(user_id, &format!("{}@school.test", user_id))
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// A signed-in teacher with a classroom under `username`
    async fn teacher(&self, username: &str) -> String {
        let token = self.token_for(Uuid::new_v4());
        let (status, _) = self
            .send(Method::POST, "/api/setup", Some(&token), Some(setup_form(username)))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        token
    }

    async fn add_student(&self, token: &str, first: &str, last: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/students",
                Some(token),
                Some(json!({
                    "first_name": first,
                    "last_name": last,
                    "date_of_birth": "2015-04-02",
                    "parent_name": format!("P. {}", last),
                    "parent_phone": "555-0100",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

fn setup_form(username: &str) -> Value {
    json!({
        "classroomName": "Grade 5 Blue",
        "username": username,
        "gradeLevel": "5",
        "academicYear": "2024-2025",
        "teacherName": "A. Smith",
    })
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // No recorder installed in tests
    let (status, _) = app.send(Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teacher_routes_require_identity() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["redirect"], "/auth/login");

    let (status, _) = app
        .send(Method::GET, "/api/dashboard", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_teacher_without_classroom_is_sent_to_setup() {
    let app = TestApp::new().await;
    let token = app.token_for(Uuid::new_v4());

    let (status, body) = app.send(Method::GET, "/api/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["redirect"], "/setup");
}

#[tokio::test]
async fn test_auth_callback_redirects_by_setup_state() {
    let config = AppConfig::default();
    let db = DbPool::connect_url("sqlite::memory:", 1).await.unwrap();
    schema::bootstrap(db.write()).await.unwrap();
    let teacher_id = Uuid::new_v4();
    let identity = MockIdentityProvider::new(JwtManager::new(
        &config.auth.identity_jwt_secret,
        IDENTITY_TOKEN_TTL_SECS,
    ))
    .with_user("code-1", teacher_id, "teacher@school.test");
    let state = AppState::new(
        config,
        db,
        Arc::new(MockLanguageModel::new()),
        Arc::new(MockBillingPortal),
        Arc::new(identity),
    );
    let app = TestApp {
        router: create_router(state.clone()),
        state,
    };

    let (status, body) = app.send(Method::GET, "/auth/callback?code=code-1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/setup");
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(Method::POST, "/api/setup", Some(&token), Some(setup_form("blue5")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.send(Method::GET, "/auth/callback?code=code-1", None, None).await;
    assert_eq!(body["redirect"], "/dashboard");

    let (status, _) = app.send(Method::GET, "/auth/callback?code=unknown", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::GET, "/auth/callback", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_setup_rejects_taken_username() {
    let app = TestApp::new().await;
    let first = app.teacher("Blue5").await;

    let (status, body) = app.send(Method::GET, "/api/settings", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "blue5");

    let other = app.token_for(Uuid::new_v4());
    let (status, body) = app
        .send(Method::POST, "/api/setup", Some(&other), Some(setup_form("blue5")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "Username already taken. Please choose another."
    );

    // Same teacher cannot set up twice
    let (status, _) = app
        .send(Method::POST, "/api/setup", Some(&first), Some(setup_form("green5")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_roster_attendance_and_grades_flow() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;

    let ada = app.add_student(&token, "Ada", "Lovelace").await;
    let grace = app.add_student(&token, "Grace", "Hopper").await;
    let ada_id = ada["id"].as_str().unwrap().to_string();
    let grace_id = grace["id"].as_str().unwrap().to_string();
    assert_ne!(ada["login_id"], grace["login_id"]);

    let (status, body) = app.send(Method::GET, "/api/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    // Attendance
    let (status, body) = app
        .send(
            Method::PUT,
            "/api/attendance",
            Some(&token),
            Some(json!({
                "date": "2025-03-03",
                "attendance": { ada_id.clone(): "present", grace_id.clone(): "absent" },
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["marked"], 2);

    let (_, body) = app
        .send(Method::GET, "/api/attendance?date=2025-03-03", Some(&token), None)
        .await;
    assert_eq!(body["attendance"][&ada_id], "present");
    assert_eq!(body["attendance"][&grace_id], "absent");

    let (_, body) = app
        .send(Method::GET, "/api/attendance?date=2025-03-04", Some(&token), None)
        .await;
    assert_eq!(body["marked"], 0);

    // Assignment and grades
    let (status, assignment) = app
        .send(
            Method::POST,
            "/api/assignments",
            Some(&token),
            Some(json!({
                "title": "Quiz 1",
                "subject": "Math",
                "total_marks": 20,
                "exam_date": "2025-03-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = assignment["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/assignments/{}/grades", assignment_id),
            Some(&token),
            Some(json!({ "grades": { ada_id.clone(): 17, grace_id.clone(): 6 } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/assignments/{}/grades", assignment_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let grades = body["grades"].as_array().unwrap();
    assert_eq!(grades.len(), 2);
    let ada_grade = grades
        .iter()
        .find(|g| g["student_id"] == ada_id.as_str())
        .unwrap();
    assert_eq!(ada_grade["percentage"], 85.0);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/assignments/{}/grades", assignment_id),
            Some(&token),
            Some(json!({ "grades": { ada_id.clone(): -1 } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Deleting a student removes their rows
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/students/{}", grace_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/assignments/{}/grades", assignment_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["grades"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_teacher_cannot_reach_another_classroom() {
    let app = TestApp::new().await;
    let blue = app.teacher("blue5").await;
    let green = app.teacher("green5").await;

    let student = app.add_student(&blue, "Ada", "Lovelace").await;
    let id = student["id"].as_str().unwrap();

    let (status, _) = app
        .send(Method::GET, &format!("/api/students/{}", id), Some(&green), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/attendance",
            Some(&green),
            Some(json!({ "date": "2025-03-03", "attendance": { id: "present" } })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_qr_download() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;
    let student = app.add_student(&token, "Ada", "Lovelace").await;

    let request = Request::builder()
        .uri(format!("/api/students/{}/qr", student["id"].as_str().unwrap()))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("_qr_code.svg"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("<svg"));
}

#[tokio::test]
async fn test_portal_login_and_progress() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;
    let ada = app.add_student(&token, "Ada", "Lovelace").await;
    let login_id = ada["login_id"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/view/nobody", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": false }));

    let (status, body) = app.send(Method::GET, "/view/blue5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["classroom"]["username"], "blue5");
    assert!(body["classroom"].get("teacher_id").is_none());

    let (status, body) = app
        .send(
            Method::POST,
            "/view/blue5/login",
            None,
            Some(json!({ "login_id": "WRONG1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid login ID");

    let (status, body) = app
        .send(
            Method::POST,
            "/view/blue5/login",
            None,
            Some(json!({ "login_id": login_id.to_lowercase() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_name"], "Ada Lovelace");
    assert_eq!(body["redirect"], "/view/blue5/progress");
    let session = body["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(Method::GET, "/view/blue5/progress", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["name"], "Ada Lovelace");
    assert_eq!(body["grades"].as_array().unwrap().len(), 0);

    let (status, body) = app.send(Method::GET, "/view/blue5/progress", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["redirect"], "/view/blue5/login");

    // A session for one classroom does not open another
    app.teacher("green5").await;
    let (status, _) = app
        .send(Method::GET, "/view/green5/progress", Some(&session), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_portal_login_is_rate_limited() {
    let mut config = AppConfig::default();
    config.rate_limit.login_attempts_per_minute = 2;
    config.rate_limit.burst = 2;
    let app = TestApp::with_config(config).await;
    app.teacher("blue5").await;

    for _ in 0..2 {
        let (status, _) = app
            .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": "nope" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app
        .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": "nope" })))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Unknown classrooms are not charged against the client
    for _ in 0..5 {
        let (status, _) = app
            .send(Method::POST, "/view/nobody/login", None, Some(json!({ "login_id": "nope" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_lockout_rejects_correct_login_id() {
    let mut config = AppConfig::default();
    config.rate_limit.login_attempts_per_minute = 1;
    config.rate_limit.burst = 1;
    let app = TestApp::with_config(config).await;
    let token = app.teacher("blue5").await;
    let ada = app.add_student(&token, "Ada", "Lovelace").await;
    let login_id = ada["login_id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": "nope" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": "nope" })))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = app
        .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": login_id })))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_whole_class_signs_in_from_one_address() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;

    let mut login_ids = Vec::new();
    for i in 0..25 {
        let student = app.add_student(&token, &format!("Pupil{}", i), "Class").await;
        login_ids.push(student["login_id"].as_str().unwrap().to_string());
    }

    for login_id in login_ids {
        let (status, _) = app
            .send(Method::POST, "/view/blue5/login", None, Some(json!({ "login_id": login_id })))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_ai_helpers() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/analyze-results",
            Some(&token),
            Some(json!({
                "grades": [{ "student_name": "Ada Lovelace", "marks_obtained": 18 }],
                "assignmentTitle": "Quiz 1",
                "totalMarks": 20,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["analysis"].as_str().unwrap().contains("Most students passed."));

    let (status, _) = app
        .send(
            Method::POST,
            "/api/ai/analyze-results",
            Some(&token),
            Some(json!({ "grades": [], "assignmentTitle": "Quiz 1", "totalMarks": 20 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/extract-grades",
            Some(&token),
            Some(json!({ "image": PNG_DATA_URL })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extractedGrades"]["grades"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/ai/extract-grades",
            Some(&token),
            Some(json!({ "image": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_extracted_marks_match_roster() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;
    let ada = app.add_student(&token, "Ada", "Lovelace").await;

    let (_, assignment) = app
        .send(
            Method::POST,
            "/api/assignments",
            Some(&token),
            Some(json!({ "title": "Quiz 1", "subject": "Math", "total_marks": 20 })),
        )
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!(
                "/api/assignments/{}/extract-grades",
                assignment["id"].as_str().unwrap()
            ),
            Some(&token),
            Some(json!({ "image": PNG_DATA_URL })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grades"][ada["id"].as_str().unwrap()], 18.0);
    assert_eq!(body["unmatched"], json!(["Grace Hopper"]));
}

#[tokio::test]
async fn test_billing_portal_requires_customer() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;

    let (status, body) = app
        .send(Method::POST, "/api/billing/portal", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Please subscribe first"));
}

#[tokio::test]
async fn test_admin_console_requires_super_admin() {
    let app = TestApp::new().await;
    let teacher = app.teacher("blue5").await;

    let (status, body) = app
        .send(Method::GET, "/api/admin/overview", Some(&teacher), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["redirect"], "/dashboard");

    let admin_id = Uuid::new_v4();
    let admin = app.token_for(admin_id);
    let repo = Repository::new(app.state.db.clone());
    repo.ensure_profile(admin_id, "admin@school.test").await.unwrap();
    repo.change_role(admin_id, admin_id, Role::SuperAdmin).await.unwrap();

    let (status, body) = app.send(Method::GET, "/api/admin/overview", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_schools"], 0);
    assert_eq!(body["total_teachers"], 1);

    let (status, school) = app
        .send(
            Method::POST,
            "/api/admin/schools",
            Some(&admin),
            Some(json!({ "name": "Hillside", "admin_email": "office@hillside.test" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(school["status"], "active");

    let (_, users) = app.send(Method::GET, "/api/admin/users", Some(&admin), None).await;
    let teacher_row = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] != admin_id.to_string().as_str())
        .unwrap()
        .clone();
    let teacher_id = teacher_row["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/admin/users/{}/role", teacher_id),
            Some(&admin),
            Some(json!({ "role": "staff" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "staff");

    let (_, trail) = app
        .send(
            Method::GET,
            &format!("/api/admin/users/{}/audit", teacher_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(trail[0]["action"], "role_changed");
    assert_eq!(trail[0]["details"]["new_role"], "staff");
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let app = TestApp::new().await;
    let token = app.teacher("blue5").await;

    // Missing `marks_obtained`
    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/analyze-results",
            Some(&token),
            Some(json!({
                "grades": [{ "student_name": "Ada" }],
                "assignmentTitle": "Quiz 1",
                "totalMarks": 20,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Not JSON at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/view/blue5/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ login_id"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_FORMAT");

    // No content type
    let request = Request::builder()
        .method(Method::POST)
        .uri("/view/blue5/login")
        .body(Body::from(r#"{"login_id":"nope"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().get("x-request-id").is_some());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
