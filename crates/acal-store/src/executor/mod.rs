//! Query executor
//!
//! Binds caller arguments to a catalog entry, prepares the statement on the
//! store and hands back a lazy row stream. `collect` drains a stream into a
//! `ResultSet` for callers that want every row at once.

#![allow(clippy::result_large_err)]

pub mod stream;
pub mod value;

pub use stream::{PreparedQuery, RowStream};
pub use value::{Arg, Record, Value};

use crate::catalog::{CatalogEntry, ParamKind, ParamSpec, QueryBuilder, QueryId};
use crate::config::CatalogConfig;
use crate::db::StoreHandle;
use crate::errors::{store_error, Result};
use acal_core::errors::InputError;
use acal_core::{log_op_end, log_op_error, log_op_start, YearMonth};
use rusqlite::Connection;
use std::time::Instant;

/// A catalog entry with its final SQL and every placeholder bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub query: QueryId,
    pub sql: String,
    pub args: Vec<Arg>,
}

/// Check `args` against `entry` and produce the executable statement
///
/// Arguments are positional. Each must match its declared kind exactly; no
/// text-to-integer coercion happens here (use [`Arg::parse`] on raw input).
/// Year-month text is checked here and bound as the month's first day.
/// The configured reporting term is bound after the caller's arguments for
/// entries that need it. A blank optional argument drops its predicate.
///
/// # Errors
/// `Validation` for wrong arity, wrong argument kind, or a malformed
/// year-month.
pub fn bind(entry: &CatalogEntry, args: &[Arg], catalog: &CatalogConfig) -> Result<BoundQuery> {
    entry.check_arity(args.len())?;
    let required = entry.params.len();

    let mut bound = entry
        .params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (spec, arg))| coerce(entry, i + 1, spec, arg))
        .collect::<std::result::Result<Vec<_>, InputError>>()?;

    if entry.binds_reporting_term {
        bound.push(Arg::Integer(catalog.reporting_term.code()));
    }

    let mut builder = QueryBuilder::new(entry.sql, bound);
    if let Some(optional) = &entry.optional {
        if let Some(arg) = args.get(required).filter(|a| !a.is_blank()) {
            let arg = coerce(entry, required + 1, &optional.param, arg)?;
            builder = builder.and_where(optional.lhs, arg);
        }
    }
    if let Some(columns) = entry.order_by {
        builder = builder.order_by(columns);
    }

    let (sql, args) = builder.build();
    Ok(BoundQuery {
        query: entry.id,
        sql,
        args,
    })
}

fn coerce(
    entry: &CatalogEntry,
    position: usize,
    spec: &ParamSpec,
    arg: &Arg,
) -> std::result::Result<Arg, InputError> {
    match (spec.kind, arg) {
        (ParamKind::Text, Arg::Text(_)) | (ParamKind::Integer, Arg::Integer(_)) => Ok(arg.clone()),
        (ParamKind::YearMonth, Arg::Text(raw)) => {
            Ok(Arg::Text(YearMonth::parse(raw)?.first_day_text()))
        }
        (kind, other) => Err(InputError::ArgumentKindMismatch {
            query: entry.name.to_string(),
            position,
            expected: kind.to_string(),
            actual: other.kind_name().to_string(),
        }),
    }
}

/// Every row of one query, with its column names
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub query: QueryId,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, in row order
    pub fn column_text(&self, column: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.get(column).map(|v| v.to_string()))
            .collect()
    }
}

/// Runs bound catalog queries against a store handle
pub struct QueryExecutor<'conn> {
    conn: &'conn Connection,
}

impl<'conn> QueryExecutor<'conn> {
    pub fn new(handle: &'conn StoreHandle) -> Self {
        Self {
            conn: handle.connection(),
        }
    }

    /// Prepare a bound query without running it
    ///
    /// # Errors
    /// Whatever the store reports while compiling the statement.
    pub fn prepare(&self, bound: &BoundQuery) -> Result<PreparedQuery<'conn>> {
        let stmt = self
            .conn
            .prepare(&bound.sql)
            .map_err(|e| store_error(bound.query.name(), e))?;
        Ok(PreparedQuery::new(bound.query, stmt, bound.args.clone()))
    }

    /// Run a bound query and drain its rows
    ///
    /// # Errors
    /// The first preparation, execution or row-read failure.
    pub fn collect(&self, bound: &BoundQuery) -> Result<ResultSet> {
        let op = bound.query.name();
        let start = Instant::now();
        log_op_start!(op, arg_count = bound.args.len());

        let result = self.prepare(bound).and_then(|mut prepared| {
            let columns = prepared.columns().to_vec();
            let rows = prepared.rows()?.collect::<Result<Vec<_>>>()?;
            Ok(ResultSet {
                query: bound.query,
                columns,
                rows,
            })
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(set) => {
                log_op_end!(op, duration_ms = duration_ms, row_count = set.len());
            }
            Err(e) => log_op_error!(op, e, duration_ms = duration_ms),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acal_core::{AcademicTerm, ExErrorKind};

    fn term(code: i64) -> CatalogConfig {
        CatalogConfig::with_term(AcademicTerm::new(code))
    }

    #[test]
    fn test_bind_rejects_wrong_arity() {
        let entry = QueryId::CoEnrollment.entry();
        let err = bind(entry, &[Arg::text("CSE101")], &term(202502)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
        assert_eq!(err.entity_id(), Some("co_enrollment"));
    }

    #[test]
    fn test_bind_rejects_text_for_integer() {
        let entry = QueryId::CourseStatsByTerm.entry();
        let err = bind(entry, &[Arg::text("202502")], &term(202502)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
        assert_eq!(err.op(), Some("bind"));
    }

    #[test]
    fn test_bind_rejects_integer_for_text() {
        let entry = QueryId::StudentsByDepartment.entry();
        assert!(bind(entry, &[Arg::Integer(7)], &term(202502)).is_err());
    }

    #[test]
    fn test_reporting_term_bound_after_caller_args() {
        let entry = QueryId::PopularCourses.entry();
        let bound = bind(entry, &[Arg::Integer(3)], &term(202601)).unwrap();
        assert_eq!(bound.args, vec![Arg::Integer(3), Arg::Integer(202601)]);
        assert!(!bound.sql.contains("202601"));
    }

    #[test]
    fn test_optional_predicate_present_and_absent() {
        let entry = QueryId::StudentsWithSchedule.entry();

        let all = bind(entry, &[], &term(202502)).unwrap();
        assert!(!all.sql.contains("s.student_id = ?"));
        assert!(all.sql.ends_with("ORDER BY s.student_id"));

        let blank = bind(entry, &[Arg::text("  ")], &term(202502)).unwrap();
        assert_eq!(blank.sql, all.sql);
        assert!(blank.args.is_empty());

        let one = bind(entry, &[Arg::text("2022000074")], &term(202502)).unwrap();
        assert!(one.sql.contains("AND s.student_id = ?1 ORDER BY s.student_id"));
        assert_eq!(one.args, vec![Arg::text("2022000074")]);
    }

    #[test]
    fn test_year_month_bound_as_first_day() {
        let entry = QueryId::DepartmentEventsByMonth.entry();
        let bound = bind(entry, &[Arg::text("2025-05")], &term(202502)).unwrap();
        assert_eq!(bound.args, vec![Arg::text("2025-05-01")]);

        let err = bind(entry, &[Arg::text("May 2025")], &term(202502)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
    }

    #[test]
    fn test_prepared_query_runs_once() {
        let handle = StoreHandle::open_in_memory().unwrap();
        handle
            .connection()
            .execute_batch(
                "CREATE TABLE student (student_id TEXT PRIMARY KEY, name TEXT, dept_id TEXT);
                 INSERT INTO student VALUES ('s1', 'Kim', 'CSE'), ('s2', 'Lee', 'CSE');",
            )
            .unwrap();

        let bound = bind(
            QueryId::StudentsByDepartment.entry(),
            &[Arg::text("CSE")],
            &term(202502),
        )
        .unwrap();
        let executor = QueryExecutor::new(&handle);
        let mut prepared = executor.prepare(&bound).unwrap();

        let names: Vec<String> = prepared
            .rows()
            .unwrap()
            .map(|r| r.unwrap().text("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Kim", "Lee"]);

        let err = prepared.rows().err().unwrap();
        assert_eq!(err.kind(), ExErrorKind::Internal);
    }
}
