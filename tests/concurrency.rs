//! Concurrent writers against a file database with a multi-connection pool.

use enrollment_api::schema::{CourseCreate, CourseUpdate, StudentCreate, StudentUpdate};
use enrollment_api::service::{CourseService, StudentService};
use enrollment_api::{connect, ensure_tables};
use sqlx::SqlitePool;
use tempfile::TempDir;

const WRITERS: i64 = 50;

async fn file_pool(dir: &TempDir) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("enrollment.db").display());
    let pool = connect(&url, 5).await.unwrap();
    ensure_tables(&pool).await.unwrap();
    pool
}

async fn seed_student(pool: &SqlitePool) -> i64 {
    let data = StudentCreate {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        age: 20,
    };
    StudentService::create(pool, &data).await.unwrap().id
}

async fn seed_course(pool: &SqlitePool, title: String) -> i64 {
    let data = CourseCreate {
        title,
        description: None,
        credits: 3,
    };
    CourseService::create(pool, &data).await.unwrap().id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_all_succeed() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let student = seed_student(&pool).await;
    let course = seed_course(&pool, "Logic".into()).await;

    let mut handles = Vec::new();
    for i in 1..=WRITERS {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let upd = StudentUpdate {
                age: Some(i),
                ..Default::default()
            };
            StudentService::update(&pool, student, &upd).await?;
            let upd = CourseUpdate {
                credits: Some(i),
                ..Default::default()
            };
            CourseService::update(&pool, course, &upd).await.map(|_| ())
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let out = StudentService::get(&pool, student).await.unwrap();
    assert!((1..=WRITERS).contains(&out.age));
    assert_eq!(out.name, "Ada");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrollments_all_succeed() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let student = seed_student(&pool).await;
    let mut courses = Vec::new();
    for i in 0..WRITERS {
        courses.push(seed_course(&pool, format!("Course {i}")).await);
    }

    let mut handles = Vec::new();
    for &course in &courses {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            StudentService::enroll(&pool, student, course).await?;
            StudentService::enroll(&pool, student, course).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let out = StudentService::get(&pool, student).await.unwrap();
    let enrolled: Vec<i64> = out.courses.iter().map(|c| c.id).collect();
    assert_eq!(enrolled, courses);

    let mut handles = Vec::new();
    for &course in &courses {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            StudentService::unenroll(&pool, student, course).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    let out = StudentService::get(&pool, student).await.unwrap();
    assert!(out.courses.is_empty());
}
