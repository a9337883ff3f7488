mod common;

use school_admin::db;
use school_admin::error::AppError;
use school_admin::models::*;
use school_admin::services;

use common::*;

fn new_class(fx: &Fixture, capacity: i64) -> NewClassRequest {
    NewClassRequest {
        name: "X-Science-1".to_string(),
        grade: 10,
        major_id: fx.major.id.clone(),
        teacher_id: fx.teacher.id.clone(),
        academic_year_id: fx.year.id.clone(),
        capacity,
        status: None,
    }
}

#[tokio::test]
async fn test_valid_class_passes() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;

    services::validate_new_class(&mut conn, &new_class(&fx, 30))
        .await
        .expect("valid class should pass");
}

#[tokio::test]
async fn test_capacity_below_one_is_rejected() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;

    let err = services::validate_new_class(&mut conn, &new_class(&fx, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("capacity")));
}

#[tokio::test]
async fn test_teacher_must_have_teacher_role() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let staff = seed_user(&mut conn, "staff1", Role::Staff).await;

    let mut req = new_class(&fx, 30);
    req.teacher_id = staff.id.clone();
    let err = services::validate_new_class(&mut conn, &req).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("not a teacher")));

    req.teacher_id = "missing".to_string();
    assert!(services::validate_new_class(&mut conn, &req).await.is_err());
}

#[tokio::test]
async fn test_inactive_teacher_is_rejected() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;

    let mut retired = seed_user(&mut conn, "teacher2", Role::Teacher).await;
    retired.status = Status::Inactive;
    db::users::update(&mut conn, &retired).await.unwrap();

    let mut req = new_class(&fx, 30);
    req.teacher_id = retired.id.clone();
    let err = services::validate_new_class(&mut conn, &req).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("inactive")));
}

#[tokio::test]
async fn test_major_and_active_year_are_required() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let closed = seed_year(&mut conn, "2023/2024", false).await;

    let mut req = new_class(&fx, 30);
    req.major_id = "no-such-major".to_string();
    let err = services::validate_new_class(&mut conn, &req).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("major")));

    let mut req = new_class(&fx, 30);
    req.academic_year_id = closed.id.clone();
    let err = services::validate_new_class(&mut conn, &req).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("not active")));
}

#[tokio::test]
async fn test_capacity_cannot_drop_below_enrollment() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 5).await;
    for n in ["001", "002", "003"] {
        let student = seed_student(&mut conn, n).await;
        services::enroll(&mut conn, &class, &student.id).await.unwrap();
    }

    let shrink = UpdateClassRequest {
        capacity: Some(2),
        ..Default::default()
    };
    let err = services::validate_class_update(&mut conn, &class, &shrink)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("already enrolled")));

    let exact = UpdateClassRequest {
        capacity: Some(3),
        ..Default::default()
    };
    services::validate_class_update(&mut conn, &class, &exact)
        .await
        .expect("capacity equal to enrollment is allowed");
}

#[tokio::test]
async fn test_update_only_checks_provided_references() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 5).await;

    // Closing the year afterwards must not block unrelated edits.
    let mut year = fx.year.clone();
    year.is_active = false;
    db::academic_years::update(&mut conn, &year).await.unwrap();

    let rename = UpdateClassRequest {
        name: Some("X-1 renamed".to_string()),
        ..Default::default()
    };
    services::validate_class_update(&mut conn, &class, &rename)
        .await
        .expect("rename should pass");

    let move_year = UpdateClassRequest {
        academic_year_id: Some(year.id.clone()),
        ..Default::default()
    };
    assert!(
        services::validate_class_update(&mut conn, &class, &move_year)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_class_with_students_cannot_be_deleted() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 5).await;
    let student = seed_student(&mut conn, "001").await;
    services::enroll(&mut conn, &class, &student.id).await.unwrap();

    let err = services::ensure_class_deletable(&mut conn, &class)
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("1 enrolled student(s)"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(db::classes::find_by_id(&mut conn, &class.id).await.unwrap().is_some());

    db::enrollments::delete(&mut conn, &class.id, &student.id).await.unwrap();
    services::ensure_class_deletable(&mut conn, &class)
        .await
        .expect("empty class can be deleted");
}
