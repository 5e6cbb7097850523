//! Data access for students, courses and enrollments.

mod courses;
mod students;
mod validation;
pub use courses::CourseService;
pub use students::StudentService;
pub use validation::{Validate, BULK_LIMIT};
