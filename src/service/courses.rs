//! Course CRUD and the students-of-course listing.

use crate::entity::{Course, Student, COURSES_TABLE, COURSE_COLUMNS};
use crate::error::AppError;
use crate::schema::{
    CourseCreate, CourseListParams, CourseOrder, CourseOut, CourseStudentsParams, CourseUpdate,
    StudentOrder, StudentOut,
};
use crate::service::students::{attach_courses, course_exists};
use crate::sql::{bind_params, select_by_id, select_courses, select_students_in_course, ContainsFilter, Page};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const INSERT_COURSE: &str = "INSERT INTO courses (title, description, credits) VALUES (?, ?, ?) \
                             RETURNING id, title, description, credits";
const UPDATE_COURSE: &str = "UPDATE courses SET title = COALESCE(?, title), \
                             description = COALESCE(?, description), credits = COALESCE(?, credits) \
                             WHERE id = ? RETURNING id, title, description, credits";
const DELETE_COURSE: &str = "DELETE FROM courses WHERE id = ?";
const DELETE_COURSE_ENROLLMENTS: &str = "DELETE FROM student_course WHERE course_id = ?";

fn course_not_found() -> AppError {
    AppError::NotFound("Course not found".into())
}

async fn fetch_course(conn: &mut SqliteConnection, id: i64) -> Result<Option<Course>, AppError> {
    let sql = select_by_id(COURSES_TABLE, COURSE_COLUMNS);
    let row = sqlx::query_as::<_, Course>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub struct CourseService;

impl CourseService {
    pub async fn create(pool: &SqlitePool, data: &CourseCreate) -> Result<CourseOut, AppError> {
        let course = sqlx::query_as::<_, Course>(INSERT_COURSE)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.credits)
            .fetch_one(pool)
            .await?;
        tracing::info!(course_id = course.id, "course created");
        Ok(course.into())
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<CourseOut, AppError> {
        let mut conn = pool.acquire().await?;
        let course = fetch_course(&mut conn, id).await?.ok_or_else(course_not_found)?;
        Ok(course.into())
    }

    /// Paged listing with optional case-insensitive title filter; order falls back to id.
    pub async fn list(
        pool: &SqlitePool,
        params: &CourseListParams,
    ) -> Result<Vec<CourseOut>, AppError> {
        let filter = params.title.as_deref().map(|needle| ContainsFilter {
            column: "title",
            needle,
        });
        let order = CourseOrder::parse(params.order_by.as_deref());
        let page = Page {
            skip: params.skip,
            limit: params.limit,
        };
        let q = select_courses(filter, order.column(), page);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query_as::<Sqlite, Course>(&q.sql), &q.params)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CourseOut::from).collect())
    }

    /// Merge present fields into the stored course.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &CourseUpdate,
    ) -> Result<CourseOut, AppError> {
        let course = sqlx::query_as::<_, Course>(UPDATE_COURSE)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.credits)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(course_not_found)?;
        tracing::info!(course_id = id, "course updated");
        Ok(course.into())
    }

    /// Delete the course and every enrollment in it.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        sqlx::query(DELETE_COURSE_ENROLLMENTS)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query(DELETE_COURSE).bind(id).execute(&mut *tx).await?;
        if res.rows_affected() == 0 {
            return Err(course_not_found());
        }
        tx.commit().await?;
        tracing::info!(course_id = id, "course deleted");
        Ok(())
    }

    /// Students enrolled in the course, each with its own course list.
    pub async fn students(
        pool: &SqlitePool,
        course_id: i64,
        params: &CourseStudentsParams,
    ) -> Result<Vec<StudentOut>, AppError> {
        let mut conn = pool.acquire().await?;
        if !course_exists(&mut conn, course_id).await? {
            return Err(course_not_found());
        }
        let order = StudentOrder::parse(params.order_by.as_deref());
        let page = Page {
            skip: params.skip,
            limit: params.limit,
        };
        let q = select_students_in_course(course_id, order.column(), page);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let students = bind_params(sqlx::query_as::<Sqlite, Student>(&q.sql), &q.params)
            .fetch_all(&mut *conn)
            .await?;
        attach_courses(&mut conn, students).await
    }
}
