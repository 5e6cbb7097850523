//! HTTP handlers for students and courses.

pub mod courses;
pub mod students;
