mod common;

use school_admin::db;
use school_admin::error::AppError;
use school_admin::models::*;
use school_admin::services;

use common::*;

#[tokio::test]
async fn test_enrollment_never_exceeds_capacity() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 2).await;

    let mut accepted = 0;
    for n in ["001", "002", "003", "004"] {
        let student = seed_student(&mut conn, n).await;
        match services::enroll(&mut conn, &class, &student.id).await {
            Ok(_) => accepted += 1,
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("is full"), "{msg}"),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(accepted, 2);
    let enrolled = db::classes::enrolled_count(&mut conn, &class.id).await.unwrap();
    assert!(enrolled <= class.capacity);
}

#[tokio::test]
async fn test_one_class_per_academic_year() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let next_year = seed_year(&mut conn, "2026/2027", true).await;
    let first = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 30).await;
    let second = seed_class(&mut conn, "X-2", &fx.teacher, &fx.major, &fx.year, 30).await;
    let later = seed_class(&mut conn, "XI-1", &fx.teacher, &fx.major, &next_year, 30).await;
    let student = seed_student(&mut conn, "001").await;

    services::enroll(&mut conn, &first, &student.id).await.unwrap();

    let err = services::enroll(&mut conn, &second, &student.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("for this academic year")));

    let again = services::enroll(&mut conn, &first, &student.id).await.unwrap_err();
    assert!(matches!(again, AppError::BadRequest(ref msg) if msg.contains("already enrolled")));

    services::enroll(&mut conn, &later, &student.id)
        .await
        .expect("a different academic year is allowed");
}

#[tokio::test]
async fn test_inactive_student_or_class_is_rejected() {
    let pool = setup_pool().await;
    let mut conn = pool.acquire().await.unwrap();
    let fx = seed_fixture(&mut conn).await;
    let mut class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 30).await;
    let mut student = seed_student(&mut conn, "001").await;

    student.status = StudentStatus::Graduated;
    db::students::update(&mut conn, &student).await.unwrap();
    assert!(services::validate_enrollment(&mut conn, &class, &student.id).await.is_err());

    student.status = StudentStatus::Active;
    db::students::update(&mut conn, &student).await.unwrap();
    class.status = Status::Inactive;
    db::classes::update(&mut conn, &class).await.unwrap();
    let err = services::validate_enrollment(&mut conn, &class, &student.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("inactive")));

    assert!(services::validate_enrollment(&mut conn, &class, "ghost").await.is_err());
}

#[tokio::test]
async fn test_rolled_back_enrollment_leaves_no_row() {
    let pool = setup_pool().await;
    let fx = {
        let mut conn = pool.acquire().await.unwrap();
        seed_fixture(&mut conn).await
    };
    let (class, student) = {
        let mut conn = pool.acquire().await.unwrap();
        let class = seed_class(&mut conn, "X-1", &fx.teacher, &fx.major, &fx.year, 1).await;
        (class, seed_student(&mut conn, "001").await)
    };

    let mut tx = pool.begin().await.unwrap();
    services::enroll(&mut tx, &class, &student.id).await.unwrap();
    tx.rollback().await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(db::classes::enrolled_count(&mut conn, &class.id).await.unwrap(), 0);
}
