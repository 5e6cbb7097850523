//! Router assembly: open routes, API-key protected entity routes, and the middleware stack.

mod common;
mod courses;
mod students;

pub use common::common_routes;
pub use courses::course_routes;
pub use students::student_routes;

use crate::extractors::ApiKey;
use crate::state::AppState;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Entity routes; every one requires a valid `X-API-KEY`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(student_routes())
        .merge(course_routes())
        .route_layer(middleware::from_extractor_with_state::<ApiKey, AppState>(
            state.clone(),
        ))
        .with_state(state)
}

/// Full application: open + protected routes with tracing, body limit and CORS
/// (any origin mirrored, credentials allowed).
pub fn app(state: AppState) -> Router {
    // Outermost first; CORS wraps the routes directly.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::very_permissive());

    Router::new()
        .merge(common_routes(state.clone()))
        .merge(api_routes(state))
        .layer(middleware)
}
