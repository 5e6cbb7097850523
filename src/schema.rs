//! Request and response shapes: create / update / read / bulk / list-query variants.

use crate::entity::{Course, Student};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

#[derive(Clone, Debug, Deserialize)]
pub struct CourseCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub credits: i64,
}

/// Partial update; absent or null fields keep their stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CourseUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credits: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseOut {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub credits: i64,
}

impl From<Course> for CourseOut {
    fn from(c: Course) -> Self {
        CourseOut {
            id: c.id,
            title: c.title,
            description: c.description,
            credits: c.credits,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudentCreate {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Partial update; absent or null fields keep their stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StudentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentOut {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub courses: Vec<CourseOut>,
}

impl StudentOut {
    pub fn new(student: Student, courses: Vec<Course>) -> Self {
        StudentOut {
            id: student.id,
            name: student.name,
            email: student.email,
            age: student.age,
            courses: courses.into_iter().map(CourseOut::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudentBulkCreate {
    pub students: Vec<StudentCreate>,
}

/// Query string for `GET /students/`.
#[derive(Clone, Debug, Deserialize)]
pub struct StudentListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
}

/// Query string for `GET /courses/`.
#[derive(Clone, Debug, Deserialize)]
pub struct CourseListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
}

/// Query string for `GET /courses/{id}/students`.
#[derive(Clone, Debug, Deserialize)]
pub struct CourseStudentsParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub order_by: Option<String>,
}

/// Sort key for student listings. Unrecognized values sort by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentOrder {
    Id,
    Name,
    Age,
}

impl StudentOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => StudentOrder::Name,
            Some("age") => StudentOrder::Age,
            _ => StudentOrder::Id,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            StudentOrder::Id => "id",
            StudentOrder::Name => "name",
            StudentOrder::Age => "age",
        }
    }
}

/// Sort key for course listings. Unrecognized values sort by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseOrder {
    Id,
    Title,
}

impl CourseOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("title") => CourseOrder::Title,
            _ => CourseOrder::Id,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            CourseOrder::Id => "id",
            CourseOrder::Title => "title",
        }
    }
}
