//! Student CRUD, bulk create and enrollment against SQLite.

use crate::entity::{Course, EnrolledCourse, Student, STUDENTS_TABLE, STUDENT_COLUMNS};
use crate::error::AppError;
use crate::schema::{StudentCreate, StudentListParams, StudentOrder, StudentOut, StudentUpdate};
use crate::service::validation::normalize_email;
use crate::sql::{
    bind_params, select_by_id, select_courses_for_students, select_students, ContainsFilter, Page,
};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashMap};

// Multi-statement writes open their transaction with a write statement: a
// deferred transaction that reads first gets SQLITE_BUSY rather than waiting.
const INSERT_STUDENT: &str =
    "INSERT INTO students (name, email, age) VALUES (?, ?, ?) RETURNING id, name, email, age";
const INSERT_STUDENT_IF_NEW: &str = "INSERT OR IGNORE INTO students (name, email, age) VALUES (?, ?, ?) \
                                     RETURNING id, name, email, age";
const UPDATE_STUDENT: &str = "UPDATE students SET name = COALESCE(?, name), \
                              email = COALESCE(?, email), age = COALESCE(?, age) \
                              WHERE id = ? RETURNING id, name, email, age";
const DELETE_STUDENT: &str = "DELETE FROM students WHERE id = ?";
const DELETE_STUDENT_ENROLLMENTS: &str = "DELETE FROM student_course WHERE student_id = ?";
const INSERT_ENROLLMENT: &str = "INSERT OR IGNORE INTO student_course (student_id, course_id) \
                                 SELECT s.id, c.id FROM students s, courses c \
                                 WHERE s.id = ? AND c.id = ?";
const DELETE_ENROLLMENT: &str = "DELETE FROM student_course WHERE student_id = ? AND course_id = ?";
const STUDENT_EXISTS: &str = "SELECT id FROM students WHERE id = ?";
const COURSE_EXISTS: &str = "SELECT id FROM courses WHERE id = ?";

fn student_not_found() -> AppError {
    AppError::NotFound("Student not found".into())
}

fn student_or_course_not_found() -> AppError {
    AppError::NotFound("Student or course not found".into())
}

/// Unique violations on students can only come from the email column.
fn email_conflict(e: sqlx::Error) -> AppError {
    match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Email already exists".into()),
        other => other,
    }
}

pub(crate) async fn fetch_student(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Student>, AppError> {
    let sql = select_by_id(STUDENTS_TABLE, STUDENT_COLUMNS);
    let row = sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

async fn row_exists(conn: &mut SqliteConnection, sql: &str, id: i64) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn course_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    row_exists(conn, COURSE_EXISTS, id).await
}

async fn both_exist(
    conn: &mut SqliteConnection,
    student_id: i64,
    course_id: i64,
) -> Result<bool, AppError> {
    Ok(row_exists(conn, STUDENT_EXISTS, student_id).await? && course_exists(conn, course_id).await?)
}

/// Load the courses of every student in one query and embed them, preserving student order.
pub(crate) async fn attach_courses(
    conn: &mut SqliteConnection,
    students: Vec<Student>,
) -> Result<Vec<StudentOut>, AppError> {
    if students.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let q = select_courses_for_students(&ids);
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let rows = bind_params(sqlx::query_as::<Sqlite, EnrolledCourse>(&q.sql), &q.params)
        .fetch_all(&mut *conn)
        .await?;

    let mut by_student: HashMap<i64, Vec<Course>> = HashMap::new();
    for row in rows {
        by_student.entry(row.student_id).or_default().push(row.into());
    }
    Ok(students
        .into_iter()
        .map(|s| {
            let courses = by_student.remove(&s.id).unwrap_or_default();
            StudentOut::new(s, courses)
        })
        .collect())
}

async fn load_one(conn: &mut SqliteConnection, id: i64) -> Result<StudentOut, AppError> {
    let student = fetch_student(conn, id).await?.ok_or_else(student_not_found)?;
    let mut out = attach_courses(conn, vec![student]).await?;
    out.pop().ok_or_else(student_not_found)
}

pub struct StudentService;

impl StudentService {
    pub async fn create(pool: &SqlitePool, data: &StudentCreate) -> Result<StudentOut, AppError> {
        let student = sqlx::query_as::<_, Student>(INSERT_STUDENT)
            .bind(&data.name)
            .bind(normalize_email(&data.email))
            .bind(data.age)
            .fetch_one(pool)
            .await
            .map_err(email_conflict)?;
        tracing::info!(student_id = student.id, "student created");
        Ok(StudentOut::new(student, Vec::new()))
    }

    /// Create every student whose email is neither repeated in the payload nor already stored.
    /// Fails with a bulk conflict only when nothing could be created.
    pub async fn bulk_create(
        pool: &SqlitePool,
        items: &[StudentCreate],
    ) -> Result<Vec<StudentOut>, AppError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let emails: Vec<String> = items.iter().map(|i| normalize_email(&i.email)).collect();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for email in &emails {
            *seen.entry(email.as_str()).or_default() += 1;
        }
        let dup_within: BTreeSet<&str> = seen
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(email, _)| *email)
            .collect();

        let mut tx = pool.begin().await?;
        let mut existing: BTreeSet<&str> = BTreeSet::new();
        let mut created = Vec::new();
        for (item, email) in items.iter().zip(&emails) {
            if dup_within.contains(email.as_str()) {
                continue;
            }
            // Ignored rows return nothing: the email is already stored.
            let row = sqlx::query_as::<_, Student>(INSERT_STUDENT_IF_NEW)
                .bind(&item.name)
                .bind(email)
                .bind(item.age)
                .fetch_optional(&mut *tx)
                .await?;
            match row {
                Some(student) => created.push(StudentOut::new(student, Vec::new())),
                None => {
                    existing.insert(email.as_str());
                }
            }
        }

        let mut errors = Vec::new();
        if !dup_within.is_empty() {
            let list: Vec<&str> = dup_within.iter().copied().collect();
            errors.push(format!("Duplicate emails in payload: {}", list.join(", ")));
        }
        if !existing.is_empty() {
            let list: Vec<&str> = existing.iter().copied().collect();
            errors.push(format!("Emails already exist: {}", list.join(", ")));
        }

        if created.is_empty() {
            return Err(AppError::BulkConflict(errors));
        }
        tx.commit().await?;

        if !errors.is_empty() {
            tracing::warn!(?errors, "bulk create skipped conflicting students");
        }
        tracing::info!(count = created.len(), "students created in bulk");
        Ok(created)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<StudentOut, AppError> {
        let mut conn = pool.acquire().await?;
        load_one(&mut conn, id).await
    }

    /// Paged listing with optional case-insensitive name filter; order falls back to id.
    pub async fn list(
        pool: &SqlitePool,
        params: &StudentListParams,
    ) -> Result<Vec<StudentOut>, AppError> {
        let filter = params.name.as_deref().map(|needle| ContainsFilter {
            column: "name",
            needle,
        });
        let order = StudentOrder::parse(params.order_by.as_deref());
        let page = Page {
            skip: params.skip,
            limit: params.limit,
        };
        let q = select_students(filter, order.column(), page);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");

        let mut conn = pool.acquire().await?;
        let students = bind_params(sqlx::query_as::<Sqlite, Student>(&q.sql), &q.params)
            .fetch_all(&mut *conn)
            .await?;
        attach_courses(&mut conn, students).await
    }

    /// Merge present fields into the stored student.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &StudentUpdate,
    ) -> Result<StudentOut, AppError> {
        let mut tx = pool.begin().await?;
        let student = sqlx::query_as::<_, Student>(UPDATE_STUDENT)
            .bind(&data.name)
            .bind(data.email.as_deref().map(normalize_email))
            .bind(data.age)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(email_conflict)?
            .ok_or_else(student_not_found)?;
        let out = attach_courses(&mut tx, vec![student])
            .await?
            .pop()
            .ok_or_else(student_not_found)?;
        tx.commit().await?;
        tracing::info!(student_id = id, "student updated");
        Ok(out)
    }

    /// Delete the student and its enrollments.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        sqlx::query(DELETE_STUDENT_ENROLLMENTS)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query(DELETE_STUDENT).bind(id).execute(&mut *tx).await?;
        if res.rows_affected() == 0 {
            return Err(student_not_found());
        }
        tx.commit().await?;
        tracing::info!(student_id = id, "student deleted");
        Ok(())
    }

    /// Add the course to the student's set. Enrolling twice keeps a single row.
    pub async fn enroll(
        pool: &SqlitePool,
        student_id: i64,
        course_id: i64,
    ) -> Result<StudentOut, AppError> {
        let mut tx = pool.begin().await?;
        let res = sqlx::query(INSERT_ENROLLMENT)
            .bind(student_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 && !both_exist(&mut tx, student_id, course_id).await? {
            return Err(student_or_course_not_found());
        }
        let out = load_one(&mut tx, student_id).await?;
        tx.commit().await?;
        if res.rows_affected() > 0 {
            tracing::info!(student_id, course_id, "student enrolled");
        }
        Ok(out)
    }

    /// Remove the course from the student's set. Unenrolling a non-member is a no-op.
    pub async fn unenroll(
        pool: &SqlitePool,
        student_id: i64,
        course_id: i64,
    ) -> Result<StudentOut, AppError> {
        let mut tx = pool.begin().await?;
        let res = sqlx::query(DELETE_ENROLLMENT)
            .bind(student_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        if !both_exist(&mut tx, student_id, course_id).await? {
            return Err(student_or_course_not_found());
        }
        let out = load_one(&mut tx, student_id).await?;
        tx.commit().await?;
        if res.rows_affected() > 0 {
            tracing::info!(student_id, course_id, "student unenrolled");
        }
        Ok(out)
    }
}
