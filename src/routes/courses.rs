//! Course routes. Collection paths are served with and without a trailing slash.

use crate::handlers::courses::{create, delete as delete_handler, list, read, students, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list).post(create))
        .route("/courses/", get(list).post(create))
        .route(
            "/courses/:id",
            get(read).put(update).delete(delete_handler),
        )
        .route("/courses/:id/students", get(students))
}
