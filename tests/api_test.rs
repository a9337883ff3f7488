mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use school_admin::api::router;
use school_admin::auth::{self, TokenKeys};
use school_admin::state::AppState;

use common::*;

const SECRET: &str = "integration-test-secret";

async fn setup_app() -> Router {
    let pool = setup_pool().await;
    {
        let mut conn = pool.acquire().await.unwrap();
        auth::bootstrap_admin(&mut conn, "admin", "admin-password")
            .await
            .expect("Failed to create admin");
    }
    router(AppState::new(pool, TokenKeys::new(SECRET, 1)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> Value {
    let (status, created) = send(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {created}");
    created
}

/// Academic year, major, subject and a teacher account created over HTTP.
async fn seed_school(app: &Router, admin: &str) -> (String, String, String, String) {
    let year = create(
        app,
        admin,
        "/academic-years",
        json!({ "name": "2025/2026", "startDate": "2025-07-01", "endDate": "2026-06-30", "isActive": true }),
    )
    .await;
    let major = create(app, admin, "/majors", json!({ "code": "SCI", "name": "Science" })).await;
    let subject = create(app, admin, "/subjects", json!({ "code": "MATH", "name": "Mathematics" })).await;
    let teacher = create(
        app,
        admin,
        "/users",
        json!({ "username": "t.lee", "password": "teacher-pass", "role": "teacher", "name": "T Lee" }),
    )
    .await;
    (
        year["id"].as_str().unwrap().to_string(),
        major["id"].as_str().unwrap().to_string(),
        subject["id"].as_str().unwrap().to_string(),
        teacher["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_app().await;
    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid username or password");

    let token = login(&app, "admin", "admin-password").await;
    let (status, me) = send(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["role"], "admin");
    assert!(me.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = setup_app().await;
    let (status, _) = send(&app, "GET", "/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/students", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roles_gate_writes() {
    let app = setup_app().await;
    let admin = login(&app, "admin", "admin-password").await;
    create(
        &app,
        &admin,
        "/users",
        json!({ "username": "s.kim", "password": "staff-pass", "role": "staff", "name": "S Kim" }),
    )
    .await;
    let staff = login(&app, "s.kim", "staff-pass").await;

    let (status, _) = send(&app, "POST", "/majors", Some(&staff), Some(json!({ "code": "ART", "name": "Art" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/users", Some(&staff), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    create(
        &app,
        &staff,
        "/students",
        json!({ "studentNumber": "2025-001", "name": "Ana", "gender": "female" }),
    )
    .await;
}

#[tokio::test]
async fn test_class_lifecycle_with_enrollment() {
    let app = setup_app().await;
    let admin = login(&app, "admin", "admin-password").await;
    let (year_id, major_id, _, teacher_id) = seed_school(&app, &admin).await;

    let (status, body) = send(
        &app,
        "POST",
        "/classes",
        Some(&admin),
        Some(json!({
            "name": "X-1", "grade": 10, "majorId": major_id, "teacherId": teacher_id,
            "academicYearId": year_id, "capacity": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let class = create(
        &app,
        &admin,
        "/classes",
        json!({
            "name": "X-1", "grade": 10, "majorId": major_id, "teacherId": teacher_id,
            "academicYearId": year_id, "capacity": 1
        }),
    )
    .await;
    let class_id = class["id"].as_str().unwrap().to_string();
    assert_eq!(class["enrolledCount"], 0);

    let ana = create(&app, &admin, "/students", json!({ "studentNumber": "001", "name": "Ana", "gender": "female" })).await;
    let ben = create(&app, &admin, "/students", json!({ "studentNumber": "002", "name": "Ben", "gender": "male" })).await;

    let roster_uri = format!("/classes/{}/students", class_id);
    create(&app, &admin, &roster_uri, json!({ "studentId": ana["id"] })).await;

    let (status, body) = send(&app, "POST", &roster_uri, Some(&admin), Some(json!({ "studentId": ben["id"] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("is full"));

    let class_uri = format!("/classes/{}", class_id);
    let (status, body) = send(&app, "DELETE", &class_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("enrolled student"));

    let (status, view) = send(&app, "GET", &class_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["enrolledCount"], 1);

    let (status, roster) = send(&app, "GET", &roster_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster[0]["studentNumber"], "001");

    let withdraw = format!("{}/{}", roster_uri, ana["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &withdraw, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &class_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &class_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_overlap_over_http() {
    let app = setup_app().await;
    let admin = login(&app, "admin", "admin-password").await;
    let (year_id, major_id, subject_id, teacher_id) = seed_school(&app, &admin).await;
    let class = create(
        &app,
        &admin,
        "/classes",
        json!({
            "name": "X-1", "grade": 10, "majorId": major_id, "teacherId": teacher_id,
            "academicYearId": year_id, "capacity": 30
        }),
    )
    .await;

    let lesson = |start: &str, end: &str| {
        json!({
            "classId": class["id"], "subjectId": subject_id, "teacherId": teacher_id,
            "dayOfWeek": 1, "startTime": start, "endTime": end, "room": "R1"
        })
    };

    let first = create(&app, &admin, "/schedules", lesson("09:00", "10:00")).await;

    let (status, body) = send(&app, "POST", "/schedules", Some(&admin), Some(lesson("09:30", "10:30"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("schedule conflict"));

    create(&app, &admin, "/schedules", lesson("10:00", "11:00")).await;

    let (status, body) = send(&app, "POST", "/schedules", Some(&admin), Some(lesson("9:00", "10:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "startTime: expected HH:mm");

    let uri = format!("/schedules/{}", first["id"].as_str().unwrap());
    let (status, updated) = send(&app, "PUT", &uri, Some(&admin), Some(json!({ "room": "Lab 2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["room"], "Lab 2");
    assert_eq!(updated["startTime"], "09:00");
}

#[tokio::test]
async fn test_student_pagination_and_child_records() {
    let app = setup_app().await;
    let admin = login(&app, "admin", "admin-password").await;

    let mut ids = Vec::new();
    for (number, name) in [("001", "Ana"), ("002", "Ben"), ("003", "Cid")] {
        let student = create(&app, &admin, "/students", json!({ "studentNumber": number, "name": name, "gender": "male" })).await;
        ids.push(student["id"].as_str().unwrap().to_string());
    }

    let (status, page) = send(&app, "GET", "/students?page=2&limit=2", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["name"], "Cid");

    let (_, found) = send(&app, "GET", "/students?search=Be", Some(&admin), None).await;
    assert_eq!(found["total"], 1);

    let attendance_uri = format!("/students/{}/attendance", ids[0]);
    create(&app, &admin, &attendance_uri, json!({ "date": "2025-09-01", "status": "present" })).await;
    let (status, _) = send(&app, "POST", &attendance_uri, Some(&admin), Some(json!({ "date": "2025-09-01", "status": "late" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let guardians_uri = format!("/students/{}/guardians", ids[1]);
    create(&app, &admin, &guardians_uri, json!({ "name": "Mia", "relationship": "mother" })).await;
    let (_, guardians) = send(&app, "GET", &guardians_uri, Some(&admin), None).await;
    assert_eq!(guardians.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/students/{}", ids[0]), Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("attendance record"));

    // guardians go with the student
    let (status, _) = send(&app, "DELETE", &format!("/students/{}", ids[1]), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/students/does-not-exist/academics", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
