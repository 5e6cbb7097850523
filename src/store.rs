//! SQLite pool setup and table DDL.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const STUDENTS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        age INTEGER NOT NULL
    )
"#;

const COURSES_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        credits INTEGER NOT NULL
    )
"#;

const STUDENT_COURSE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS student_course (
        student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        PRIMARY KEY (student_id, course_id)
    )
"#;

const INDEXES_DDL: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ix_students_name ON students (name)",
    "CREATE INDEX IF NOT EXISTS ix_courses_title ON courses (title)",
    "CREATE INDEX IF NOT EXISTS ix_student_course_course ON student_course (course_id)",
];

/// Open a pool for `database_url`, creating the database file if it does not exist.
/// Foreign keys are enforced on every connection.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    // Each in-memory connection is its own database, so pin the pool to one long-lived connection.
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_opts = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };
    let pool = pool_opts.connect_with(opts).await?;
    Ok(pool)
}

/// Create students, courses and the student_course join table if missing. Idempotent.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for ddl in [STUDENTS_DDL, COURSES_DDL, STUDENT_COURSE_DDL] {
        sqlx::query(ddl).execute(pool).await?;
    }
    for ddl in INDEXES_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("database tables ready");
    Ok(())
}
