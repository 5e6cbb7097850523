//! Student handlers: create, bulk create, list, read, update, delete, enroll, unenroll.

use crate::error::AppError;
use crate::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::schema::{StudentBulkCreate, StudentCreate, StudentListParams, StudentOut, StudentUpdate};
use crate::service::StudentService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<StudentCreate>,
) -> Result<(StatusCode, Json<StudentOut>), AppError> {
    let student = StudentService::create(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn bulk_create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<StudentBulkCreate>,
) -> Result<(StatusCode, Json<Vec<StudentOut>>), AppError> {
    let students = StudentService::bulk_create(&state.pool, &body.students).await?;
    Ok((StatusCode::CREATED, Json(students)))
}

pub async fn list(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<StudentListParams>,
) -> Result<Json<Vec<StudentOut>>, AppError> {
    let students = StudentService::list(&state.pool, &params).await?;
    Ok(Json(students))
}

pub async fn read(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<StudentOut>, AppError> {
    let student = StudentService::get(&state.pool, id).await?;
    Ok(Json(student))
}

pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<StudentUpdate>,
) -> Result<Json<StudentOut>, AppError> {
    let student = StudentService::update(&state.pool, id, &body).await?;
    Ok(Json(student))
}

pub async fn delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enroll(
    State(state): State<AppState>,
    ValidPath((student_id, course_id)): ValidPath<(i64, i64)>,
) -> Result<Json<StudentOut>, AppError> {
    let student = StudentService::enroll(&state.pool, student_id, course_id).await?;
    Ok(Json(student))
}

pub async fn unenroll(
    State(state): State<AppState>,
    ValidPath((student_id, course_id)): ValidPath<(i64, i64)>,
) -> Result<Json<StudentOut>, AppError> {
    let student = StudentService::unenroll(&state.pool, student_id, course_id).await?;
    Ok(Json(student))
}
