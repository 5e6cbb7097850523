//! Student routes. Collection paths are served with and without a trailing slash.

use crate::handlers::students::{
    bulk_create, create, delete as delete_handler, enroll, list, read, unenroll, update,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list).post(create))
        .route("/students/", get(list).post(create))
        .route("/students/bulk", post(bulk_create))
        .route(
            "/students/:id",
            get(read).put(update).delete(delete_handler),
        )
        .route("/students/:id/enroll/:course_id", post(enroll))
        .route("/students/:id/unenroll/:course_id", post(unenroll))
}
