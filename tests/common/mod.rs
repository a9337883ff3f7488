#![allow(dead_code)]

use sqlx::{SqliteConnection, SqlitePool};

use school_admin::db;
use school_admin::models::*;

pub async fn setup_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

pub async fn seed_user(conn: &mut SqliteConnection, username: &str, role: Role) -> User {
    let now = db::now();
    let user = User {
        id: db::new_id(),
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role,
        name: format!("{} name", username),
        email: None,
        status: Status::Active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::users::insert(conn, &user).await.expect("Failed to insert user");
    user
}

pub async fn seed_year(conn: &mut SqliteConnection, name: &str, is_active: bool) -> AcademicYear {
    let now = db::now();
    let year = AcademicYear {
        id: db::new_id(),
        name: name.to_string(),
        start_date: "2025-07-01".to_string(),
        end_date: "2026-06-30".to_string(),
        is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::academic_years::insert(conn, &year)
        .await
        .expect("Failed to insert academic year");
    year
}

pub async fn seed_entry(
    conn: &mut SqliteConnection,
    catalog: db::catalog::Catalog,
    code: &str,
) -> CatalogEntry {
    let now = db::now();
    let entry = CatalogEntry {
        id: db::new_id(),
        code: code.to_string(),
        name: format!("{} name", code),
        description: None,
        created_at: now.clone(),
        updated_at: now,
    };
    db::catalog::insert(conn, catalog, &entry)
        .await
        .expect("Failed to insert catalog entry");
    entry
}

pub async fn seed_class(
    conn: &mut SqliteConnection,
    name: &str,
    teacher: &User,
    major: &Major,
    year: &AcademicYear,
    capacity: i64,
) -> ClassRoom {
    let now = db::now();
    let class = ClassRoom {
        id: db::new_id(),
        name: name.to_string(),
        grade: 10,
        major_id: major.id.clone(),
        teacher_id: teacher.id.clone(),
        academic_year_id: year.id.clone(),
        capacity,
        status: Status::Active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::classes::insert(conn, &class).await.expect("Failed to insert class");
    class
}

pub async fn seed_student(conn: &mut SqliteConnection, number: &str) -> Student {
    let now = db::now();
    let student = Student {
        id: db::new_id(),
        student_number: number.to_string(),
        name: format!("Student {}", number),
        gender: Gender::Female,
        birth_date: Some("2010-05-04".to_string()),
        address: None,
        phone: None,
        email: None,
        status: StudentStatus::Active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::students::insert(conn, &student)
        .await
        .expect("Failed to insert student");
    student
}

/// A teacher, a major and an active academic year: enough to hang classes on.
pub struct Fixture {
    pub teacher: User,
    pub major: Major,
    pub subject: Subject,
    pub year: AcademicYear,
}

pub async fn seed_fixture(conn: &mut SqliteConnection) -> Fixture {
    Fixture {
        teacher: seed_user(conn, "teacher1", Role::Teacher).await,
        major: seed_entry(conn, db::catalog::Catalog::Majors, "SCI").await,
        subject: seed_entry(conn, db::catalog::Catalog::Subjects, "MATH").await,
        year: seed_year(conn, "2025/2026", true).await,
    }
}
