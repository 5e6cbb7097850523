//! Course handlers: create, list, read, update, delete, enrolled students.

use crate::error::AppError;
use crate::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::schema::{CourseCreate, CourseListParams, CourseOut, CourseStudentsParams, CourseUpdate, StudentOut};
use crate::service::CourseService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CourseCreate>,
) -> Result<(StatusCode, Json<CourseOut>), AppError> {
    let course = CourseService::create(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn list(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<CourseListParams>,
) -> Result<Json<Vec<CourseOut>>, AppError> {
    let courses = CourseService::list(&state.pool, &params).await?;
    Ok(Json(courses))
}

pub async fn read(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<CourseOut>, AppError> {
    let course = CourseService::get(&state.pool, id).await?;
    Ok(Json(course))
}

pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<CourseUpdate>,
) -> Result<Json<CourseOut>, AppError> {
    let course = CourseService::update(&state.pool, id, &body).await?;
    Ok(Json(course))
}

pub async fn delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    CourseService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn students(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidQuery(params): ValidQuery<CourseStudentsParams>,
) -> Result<Json<Vec<StudentOut>>, AppError> {
    let students = CourseService::students(&state.pool, id, &params).await?;
    Ok(Json(students))
}
