//! REST backend for students, courses, and enrollments on SQLite.

pub mod config;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, ConfigError};
pub use routes::app;
pub use state::AppState;
pub use store::{connect, ensure_tables};
