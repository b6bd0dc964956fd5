//! Engine-level read-only query surface.
//!
//! One `CatalogQuery` variant per catalog entry, each carrying exactly that
//! entry's positional arguments. `apply_catalog_query` is the single entry
//! point; it never writes to the store.

#![allow(clippy::result_large_err)]

use crate::context::EngineContext;
use acal_core::errors::InputError;
use acal_core::rules::optional_value;
use acal_core::{log_op_end, log_op_error, log_op_start};
use acal_store::errors::Result;
use acal_store::{bind, Arg, QueryExecutor, QueryId, ResultSet, StoreHandle};
use std::time::Instant;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    StudentsByDepartment { dept_id: String },
    GroupsByPurpose { purpose: String },
    CourseStatsByTerm { term: i64 },
    CoEnrollment { course_a: String, course_b: String },
    /// `None` lists every student with at least one schedule entry
    StudentsWithSchedule { student_id: Option<String> },
    CourseLookupByCodes { codes: [String; 3] },
    PopularCourses { min_count: i64 },
    /// `YYYY-MM`
    DepartmentEventsByMonth { year_month: String },
    SectionEnrollmentRanking,
    StudentCreditRanking,
    EnrolledUnion { course_a: String, course_b: String },
    EnrolledDifference { course_a: String, course_b: String },
    EnrolledIntersection { course_a: String, course_b: String },
    StudentSchedules { student_id: String },
}

impl CatalogQuery {
    pub fn id(&self) -> QueryId {
        match self {
            CatalogQuery::StudentsByDepartment { .. } => QueryId::StudentsByDepartment,
            CatalogQuery::GroupsByPurpose { .. } => QueryId::GroupsByPurpose,
            CatalogQuery::CourseStatsByTerm { .. } => QueryId::CourseStatsByTerm,
            CatalogQuery::CoEnrollment { .. } => QueryId::CoEnrollment,
            CatalogQuery::StudentsWithSchedule { .. } => QueryId::StudentsWithSchedule,
            CatalogQuery::CourseLookupByCodes { .. } => QueryId::CourseLookupByCodes,
            CatalogQuery::PopularCourses { .. } => QueryId::PopularCourses,
            CatalogQuery::DepartmentEventsByMonth { .. } => QueryId::DepartmentEventsByMonth,
            CatalogQuery::SectionEnrollmentRanking => QueryId::SectionEnrollmentRanking,
            CatalogQuery::StudentCreditRanking => QueryId::StudentCreditRanking,
            CatalogQuery::EnrolledUnion { .. } => QueryId::EnrolledUnion,
            CatalogQuery::EnrolledDifference { .. } => QueryId::EnrolledDifference,
            CatalogQuery::EnrolledIntersection { .. } => QueryId::EnrolledIntersection,
            CatalogQuery::StudentSchedules { .. } => QueryId::StudentSchedules,
        }
    }

    /// Positional arguments in catalog order
    pub fn args(&self) -> Vec<Arg> {
        match self {
            CatalogQuery::StudentsByDepartment { dept_id: value }
            | CatalogQuery::GroupsByPurpose { purpose: value }
            | CatalogQuery::DepartmentEventsByMonth { year_month: value }
            | CatalogQuery::StudentSchedules { student_id: value } => vec![Arg::text(value)],
            CatalogQuery::CourseStatsByTerm { term: value }
            | CatalogQuery::PopularCourses { min_count: value } => vec![Arg::Integer(*value)],
            CatalogQuery::CoEnrollment { course_a, course_b }
            | CatalogQuery::EnrolledUnion { course_a, course_b }
            | CatalogQuery::EnrolledDifference { course_a, course_b }
            | CatalogQuery::EnrolledIntersection { course_a, course_b } => {
                vec![Arg::text(course_a), Arg::text(course_b)]
            }
            CatalogQuery::StudentsWithSchedule { student_id } => {
                student_id.iter().map(Arg::text).collect()
            }
            CatalogQuery::CourseLookupByCodes { codes } => codes.iter().map(Arg::text).collect(),
            CatalogQuery::SectionEnrollmentRanking | CatalogQuery::StudentCreditRanking => {
                Vec::new()
            }
        }
    }

    /// Build a query from raw dispatcher strings
    ///
    /// A year-month is only checked when the query is bound.
    ///
    /// # Errors
    /// `Validation` for the wrong number of strings or a non-numeric
    /// integer parameter.
    pub fn from_raw(id: QueryId, raw: &[&str]) -> Result<Self> {
        let entry = id.entry();
        entry.check_arity(raw.len())?;

        let args = entry
            .params
            .iter()
            .zip(raw)
            .map(|(spec, value)| Arg::parse(spec.kind, spec.name, value))
            .collect::<std::result::Result<Vec<_>, InputError>>()?;
        let text = |i: usize| args[i].to_string();
        let integer = |i: usize| match args[i] {
            Arg::Integer(value) => Ok(value),
            Arg::Text(_) => Err(InputError::ArgumentKindMismatch {
                query: entry.name.to_string(),
                position: i + 1,
                expected: entry.params[i].kind.to_string(),
                actual: args[i].kind_name().to_string(),
            }),
        };

        Ok(match id {
            QueryId::StudentsByDepartment => CatalogQuery::StudentsByDepartment {
                dept_id: text(0),
            },
            QueryId::GroupsByPurpose => CatalogQuery::GroupsByPurpose { purpose: text(0) },
            QueryId::CourseStatsByTerm => CatalogQuery::CourseStatsByTerm {
                term: integer(0)?,
            },
            QueryId::CoEnrollment => CatalogQuery::CoEnrollment {
                course_a: text(0),
                course_b: text(1),
            },
            QueryId::StudentsWithSchedule => CatalogQuery::StudentsWithSchedule {
                student_id: raw
                    .first()
                    .and_then(|value| optional_value(value))
                    .map(str::to_string),
            },
            QueryId::CourseLookupByCodes => CatalogQuery::CourseLookupByCodes {
                codes: [text(0), text(1), text(2)],
            },
            QueryId::PopularCourses => CatalogQuery::PopularCourses {
                min_count: integer(0)?,
            },
            QueryId::DepartmentEventsByMonth => CatalogQuery::DepartmentEventsByMonth {
                year_month: text(0),
            },
            QueryId::SectionEnrollmentRanking => CatalogQuery::SectionEnrollmentRanking,
            QueryId::StudentCreditRanking => CatalogQuery::StudentCreditRanking,
            QueryId::EnrolledUnion => CatalogQuery::EnrolledUnion {
                course_a: text(0),
                course_b: text(1),
            },
            QueryId::EnrolledDifference => CatalogQuery::EnrolledDifference {
                course_a: text(0),
                course_b: text(1),
            },
            QueryId::EnrolledIntersection => CatalogQuery::EnrolledIntersection {
                course_a: text(0),
                course_b: text(1),
            },
            QueryId::StudentSchedules => CatalogQuery::StudentSchedules {
                student_id: text(0),
            },
        })
    }
}

/// Result of applying a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Rows(ResultSet),
    /// Explicit "no match" for lookups where an empty result is news
    NoMatch { query: QueryId },
    /// Rows plus the trailing total the listing reports
    Counted { rows: ResultSet, total: usize },
}

impl CatalogOutcome {
    /// Rows to render, if any
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            CatalogOutcome::Rows(rows) | CatalogOutcome::Counted { rows, .. } => Some(rows),
            CatalogOutcome::NoMatch { .. } => None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows().map_or(0, ResultSet::len)
    }
}

/// Apply a read-only catalog query.
///
/// # Errors
/// `Validation` for bad arguments, `Execution` or `Connection` when the
/// store fails. The error carries the context's request id.
pub fn apply_catalog_query(
    handle: &StoreHandle,
    query: &CatalogQuery,
    ctx: &EngineContext,
) -> Result<CatalogOutcome> {
    let id = query.id();
    log_op_start!(
        "catalog_query",
        query = id.name(),
        request_id = %ctx.request.request_id,
        origin = ctx.request.origin.as_str()
    );
    let start = Instant::now();

    let result = bind(id.entry(), &query.args(), &ctx.catalog)
        .and_then(|bound| QueryExecutor::new(handle).collect(&bound))
        .map(|rows| shape(id, rows));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => log_op_end!(
            "catalog_query",
            duration_ms = elapsed,
            query = id.name(),
            row_count = outcome.row_count()
        ),
        Err(e) => log_op_error!("catalog_query", e, duration_ms = elapsed, query = id.name()),
    }
    result.map_err(|e| ctx.tag(e))
}

fn shape(id: QueryId, rows: ResultSet) -> CatalogOutcome {
    match id {
        QueryId::StudentsByDepartment if rows.is_empty() => CatalogOutcome::NoMatch { query: id },
        QueryId::StudentsWithSchedule => CatalogOutcome::Counted {
            total: rows.len(),
            rows,
        },
        _ => CatalogOutcome::Rows(rows),
    }
}
