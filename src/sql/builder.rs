//! Builds parameterized SELECTs for listings and relation loading.
//! Identifiers come from code constants only; user input is always a bound parameter.

use crate::entity::{COURSES_TABLE, COURSE_COLUMNS, ENROLLMENT_TABLE, STUDENTS_TABLE, STUDENT_COLUMNS};
use crate::sql::SqlParam;

/// Quote identifier for SQLite (safe: only from code).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(alias: Option<&str>, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{}", a, quoted(c)),
            None => quoted(c),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// ORDER BY on `column`, ties broken by id so paging is stable.
fn order_clause(alias: Option<&str>, column: &str) -> String {
    let col = |c: &str| match alias {
        Some(a) => format!("{}.{}", a, quoted(c)),
        None => quoted(c),
    };
    if column == "id" {
        format!("ORDER BY {} ASC", col("id"))
    } else {
        format!("ORDER BY {} ASC, {} ASC", col(column), col("id"))
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn push_param(&mut self, v: impl Into<SqlParam>) {
        self.params.push(v.into());
    }
}

/// OFFSET / LIMIT window of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

/// Case-insensitive substring match on one text column.
#[derive(Clone, Copy, Debug)]
pub struct ContainsFilter<'a> {
    pub column: &'static str,
    pub needle: &'a str,
}

/// `%needle%` for LIKE, with `\`, `%` and `_` escaped so they match literally.
/// Only ASCII letters are folded, matching SQLite's `lower()` on the column side.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.to_ascii_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// SELECT one row by id. Caller binds the id as the sole param.
pub fn select_by_id(table: &str, columns: &[&str]) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(None, columns),
        quoted(table),
        quoted("id")
    )
}

/// SELECT list with optional substring filter, whitelisted order column, and paging.
pub fn select_list(
    table: &str,
    columns: &[&str],
    filter: Option<ContainsFilter<'_>>,
    order_column: &str,
    page: Page,
) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut sql = format!("SELECT {} FROM {}", column_list(None, columns), quoted(table));
    if let Some(f) = filter.filter(|f| !f.needle.is_empty()) {
        sql.push_str(&format!(" WHERE lower({}) LIKE ? ESCAPE '\\'", quoted(f.column)));
        q.push_param(like_pattern(f.needle));
    }
    sql.push(' ');
    sql.push_str(&order_clause(None, order_column));
    sql.push_str(" LIMIT ? OFFSET ?");
    q.push_param(page.limit);
    q.push_param(page.skip);
    q.sql = sql;
    q
}

pub fn select_students(filter: Option<ContainsFilter<'_>>, order_column: &str, page: Page) -> QueryBuf {
    select_list(STUDENTS_TABLE, STUDENT_COLUMNS, filter, order_column, page)
}

pub fn select_courses(filter: Option<ContainsFilter<'_>>, order_column: &str, page: Page) -> QueryBuf {
    select_list(COURSES_TABLE, COURSE_COLUMNS, filter, order_column, page)
}

/// Courses of many students in one query, each row tagged with `student_id`.
pub fn select_courses_for_students(student_ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::default();
    q.sql = format!(
        "SELECT sc.{sid} AS student_id, {cols} FROM {join} sc JOIN {courses} c ON c.{id} = sc.{cid} \
         WHERE sc.{sid} IN ({ph}) ORDER BY sc.{sid} ASC, c.{id} ASC",
        sid = quoted("student_id"),
        cid = quoted("course_id"),
        id = quoted("id"),
        cols = column_list(Some("c"), COURSE_COLUMNS),
        join = quoted(ENROLLMENT_TABLE),
        courses = quoted(COURSES_TABLE),
        ph = placeholders(student_ids.len()),
    );
    for id in student_ids {
        q.push_param(*id);
    }
    q
}

/// Students enrolled in one course, ordered and paged.
pub fn select_students_in_course(course_id: i64, order_column: &str, page: Page) -> QueryBuf {
    let mut q = QueryBuf::default();
    q.sql = format!(
        "SELECT {cols} FROM {students} s JOIN {join} sc ON sc.{sid} = s.{id} WHERE sc.{cid} = ? {order} LIMIT ? OFFSET ?",
        cols = column_list(Some("s"), STUDENT_COLUMNS),
        students = quoted(STUDENTS_TABLE),
        join = quoted(ENROLLMENT_TABLE),
        sid = quoted("student_id"),
        cid = quoted("course_id"),
        id = quoted("id"),
        order = order_clause(Some("s"), order_column),
    );
    q.push_param(course_id);
    q.push_param(page.limit);
    q.push_param(page.skip);
    q
}
