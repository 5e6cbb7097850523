//! Field rules for request shapes.

use crate::error::AppError;
use crate::schema::{
    CourseCreate, CourseListParams, CourseStudentsParams, CourseUpdate, StudentBulkCreate,
    StudentCreate, StudentListParams, StudentUpdate, MAX_LIMIT,
};
use regex::Regex;
use std::sync::OnceLock;

pub const NAME_MIN_LENGTH: usize = 2;
pub const TITLE_MIN_LENGTH: usize = 2;
pub const BULK_LIMIT: usize = 100;

/// Implemented by every request shape; run after deserialization and before any query.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email pattern compiles")
    })
}

fn min_length(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.trim().chars().count() < min {
        return Err(AppError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    Ok(())
}

fn email(field: &str, value: &str) -> Result<(), AppError> {
    if !email_regex().is_match(value) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

/// Stored form of an email: local part as given, domain lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn positive(field: &str, value: i64) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!("{} must be greater than 0", field)));
    }
    Ok(())
}

fn limit_in_range(limit: u32) -> Result<(), AppError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(())
}

impl Validate for StudentCreate {
    fn validate(&self) -> Result<(), AppError> {
        min_length("name", &self.name, NAME_MIN_LENGTH)?;
        email("email", &self.email)?;
        positive("age", self.age)
    }
}

impl Validate for StudentUpdate {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            min_length("name", name, NAME_MIN_LENGTH)?;
        }
        if let Some(e) = &self.email {
            email("email", e)?;
        }
        if let Some(age) = self.age {
            positive("age", age)?;
        }
        Ok(())
    }
}

impl Validate for StudentBulkCreate {
    fn validate(&self) -> Result<(), AppError> {
        if self.students.len() > BULK_LIMIT {
            return Err(AppError::Validation(format!(
                "bulk create limited to {} items",
                BULK_LIMIT
            )));
        }
        for (i, s) in self.students.iter().enumerate() {
            s.validate().map_err(|e| match e {
                AppError::Validation(msg) => AppError::Validation(format!("students[{}]: {}", i, msg)),
                other => other,
            })?;
        }
        Ok(())
    }
}

impl Validate for CourseCreate {
    fn validate(&self) -> Result<(), AppError> {
        min_length("title", &self.title, TITLE_MIN_LENGTH)?;
        positive("credits", self.credits)
    }
}

impl Validate for CourseUpdate {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            min_length("title", title, TITLE_MIN_LENGTH)?;
        }
        if let Some(credits) = self.credits {
            positive("credits", credits)?;
        }
        Ok(())
    }
}

impl Validate for StudentListParams {
    fn validate(&self) -> Result<(), AppError> {
        limit_in_range(self.limit)
    }
}

impl Validate for CourseListParams {
    fn validate(&self) -> Result<(), AppError> {
        limit_in_range(self.limit)
    }
}

impl Validate for CourseStudentsParams {
    fn validate(&self) -> Result<(), AppError> {
        limit_in_range(self.limit)
    }
}
