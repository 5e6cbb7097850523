//! Row types for the students, courses and student_course tables.

use sqlx::FromRow;

pub const STUDENTS_TABLE: &str = "students";
pub const COURSES_TABLE: &str = "courses";
pub const ENROLLMENT_TABLE: &str = "student_course";

pub const STUDENT_COLUMNS: &[&str] = &["id", "name", "email", "age"];
pub const COURSE_COLUMNS: &[&str] = &["id", "title", "description", "credits"];

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i64,
}

/// A course joined through student_course, tagged with the owning student.
#[derive(Clone, Debug, FromRow)]
pub struct EnrolledCourse {
    pub student_id: i64,
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i64,
}

impl From<EnrolledCourse> for Course {
    fn from(row: EnrolledCourse) -> Self {
        Course {
            id: row.id,
            title: row.title,
            description: row.description,
            credits: row.credits,
        }
    }
}
